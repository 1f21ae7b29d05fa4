//! Error types for recipe documents
//!
//! Covers every way a single document can fail to yield a `RecipeConfig`:
//! - No frontmatter block
//! - Frontmatter that is not a YAML mapping
//! - A mapping whose containers have the wrong shape
//! - IO failures reading or writing the document

use std::path::PathBuf;

/// Errors produced while loading a recipe document
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    /// Document has no delimited frontmatter block
    #[error("no frontmatter block")]
    MissingFrontmatter,

    /// Frontmatter is not valid YAML or not a mapping at the top level
    #[error("YAML parse error: {message}")]
    Parse { message: String },

    /// A recognized top-level key has the wrong container type
    #[error("invalid shape: `{field}` must be {expected}")]
    Shape {
        field: &'static str,
        expected: &'static str,
    },

    /// IO error reading or writing the document
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RecipeError {
    /// Create parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create shape error for a top-level field
    #[must_use]
    pub fn shape(field: &'static str, expected: &'static str) -> Self {
        Self::Shape { field, expected }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for recipe operations
pub type RecipeResult<T> = Result<T, RecipeError>;
