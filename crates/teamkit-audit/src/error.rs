//! Error types for audit runs
//!
//! Per-document problems never surface here: they are captured in the
//! batch reports. These errors abort a run before any document is read.

use std::path::PathBuf;

/// Errors that stop a whole audit run
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Configuration file could not be read
    #[error("io error reading config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for `AuditConfig`
    #[error("invalid config {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Recipe directory could not be listed
    #[error("cannot read recipe directory {path}: {source}")]
    RecipeDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for audit runs
pub type AuditResult<T> = Result<T, AuditError>;
