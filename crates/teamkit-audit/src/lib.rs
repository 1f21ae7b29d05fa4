//! Teamkit Audit
//!
//! Keeps team recipes scaffoldable. Two operations share the recipe model:
//!
//! - **Check**: every (role, template) pair of a team recipe must resolve to
//!   a shared `templates.<template>` or a role-scoped
//!   `templates.<role>.<template>` key.
//! - **Patch**: insert the canonical shared `tools`/`status`/`notes`
//!   templates into recipes that lack any of them, idempotently.
//!
//! # Architecture
//!
//! ```text
//! RecipeBatch ──► RecipeDocument ──► RecipeConfig ──► CoverageChecker ──► ScanReport
//!      │
//!      └────────► RecipeDocument text ──► TemplateInserter ──► PatchReport (writes changed files)
//! ```
//!
//! # Example
//!
//! ```rust
//! use teamkit_audit::{CoverageChecker, TemplateInserter};
//! use teamkit_recipe::RecipeDocument;
//!
//! let text = "---\nkind: team\nfiles:\n  - template: tools\nagents:\n  - role: lead\ntemplates:\n  lead.soul: |\n    x\n---\n";
//!
//! let config = RecipeDocument::new("ops-team.md", text).config().unwrap();
//! let problems = CoverageChecker::new().check("ops-team.md", &config);
//! assert_eq!(problems[0].missing_key, "lead.tools");
//!
//! let patched = TemplateInserter::new().patch(text);
//! assert!(patched.changed());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod batch;
pub mod config;
pub mod coverage;
pub mod error;
pub mod inserter;
pub mod report;
pub mod shared_block;

// Re-exports for convenience
pub use batch::{
    DocumentFailure, DocumentScan, PatchEntry, PatchMode, PatchReport, PatchStatus, RecipeBatch,
    ScanReport, TargetSelection,
};
pub use config::{AuditConfig, DEFAULT_TARGETS};
pub use coverage::{CoverageChecker, CoverageObligation, CoverageProblem};
pub use error::{AuditError, AuditResult};
pub use inserter::{PatchDecision, PatchOutcome, TemplateInserter};
pub use report::Outcome;
pub use shared_block::{SharedTemplateBlock, SHARED_TEMPLATES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running audits
    pub use crate::batch::{PatchMode, RecipeBatch, TargetSelection};
    pub use crate::config::AuditConfig;
    pub use crate::coverage::{CoverageChecker, CoverageProblem};
    pub use crate::inserter::TemplateInserter;
    pub use crate::report::Outcome;
    pub use teamkit_recipe::{RecipeConfig, RecipeDocument};
}
