//! Teamkit Recipe Model
//!
//! The read side of team recipe documents: a markdown file whose leading
//! frontmatter block describes a team of agent roles, the files each role
//! scaffolds, and the templates those files are rendered from.
//!
//! # Pipeline
//!
//! ```text
//! text → FrontmatterExtractor → ConfigParser (YAML mapping) → RecipeConfig
//! ```
//!
//! # Example
//!
//! ```rust
//! use teamkit_recipe::{RecipeDocument, TEAM_KIND};
//!
//! let doc = RecipeDocument::new(
//!     "law-firm-team.md",
//!     "---\nkind: team\nagents:\n  - role: lead\n---\n# Law Firm\n",
//! );
//! let config = doc.config().unwrap();
//! assert!(config.is_kind(TEAM_KIND));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod parser;

// Re-exports for convenience
pub use config::{role_scoped_key, AgentEntry, FileEntry, RecipeConfig, TEAM_KIND};
pub use document::RecipeDocument;
pub use error::{RecipeError, RecipeResult};
pub use frontmatter::{Frontmatter, FrontmatterExtractor};
pub use parser::{ConfigParser, YamlConfigParser};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
