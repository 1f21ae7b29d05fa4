//! Audit run configuration
//!
//! Defaults describe the built-in recipe set; a TOML file can override any
//! field:
//!
//! ```toml
//! recipe_dir = "recipes/default"
//! team_kind = "team"
//! targets = ["law-firm-team.md"]
//! discover_suffix = "-team.md"
//! parallel = true
//! ```

use crate::error::{AuditError, AuditResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use teamkit_recipe::TEAM_KIND;

/// Built-in team recipes patched by default
pub const DEFAULT_TARGETS: &[&str] = &[
    "business-team.md",
    "clinic-team.md",
    "construction-team.md",
    "crypto-trader-team.md",
    "financial-planner-team.md",
    "law-firm-team.md",
];

/// Audit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Directory holding the recipe documents
    pub recipe_dir: PathBuf,
    /// Kind tag of recipes subject to coverage checks
    pub team_kind: String,
    /// Fixed document identifiers, relative to `recipe_dir`
    pub targets: Vec<String>,
    /// File name suffix used when discovering recipes
    pub discover_suffix: String,
    /// Process documents on the rayon pool
    pub parallel: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            recipe_dir: PathBuf::from("recipes/default"),
            team_kind: TEAM_KIND.to_string(),
            targets: DEFAULT_TARGETS.iter().map(|t| (*t).to_string()).collect(),
            discover_suffix: "-team.md".to_string(),
            parallel: false,
        }
    }
}

impl AuditConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// `toml::de::Error` on invalid TOML or unknown fields.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// `AuditError::ConfigIo` if the file cannot be read,
    /// `AuditError::InvalidConfig` if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AuditError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| AuditError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With recipe directory
    #[inline]
    #[must_use]
    pub fn with_recipe_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recipe_dir = dir.into();
        self
    }

    /// With fixed targets
    #[must_use]
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// With team kind tag
    #[inline]
    #[must_use]
    pub fn with_team_kind(mut self, kind: impl Into<String>) -> Self {
        self.team_kind = kind.into();
        self
    }

    /// With parallel document processing
    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_builtin_recipes() {
        let cfg = AuditConfig::new();
        assert_eq!(cfg.recipe_dir, PathBuf::from("recipes/default"));
        assert_eq!(cfg.team_kind, "team");
        assert_eq!(cfg.targets.len(), 6);
        assert_eq!(cfg.targets[5], "law-firm-team.md");
        assert!(!cfg.parallel);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AuditConfig::from_toml_str("recipe_dir = \"fixtures\"\nparallel = true\n").unwrap();
        assert_eq!(cfg.recipe_dir, PathBuf::from("fixtures"));
        assert!(cfg.parallel);
        assert_eq!(cfg.discover_suffix, "-team.md");
        assert_eq!(cfg.targets, AuditConfig::new().targets);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(AuditConfig::from_toml_str("recipe_directory = \"x\"\n").is_err());
    }

    #[test]
    fn builder_methods() {
        let cfg = AuditConfig::new()
            .with_recipe_dir("r")
            .with_targets(["a-team.md"])
            .with_team_kind("squad")
            .with_parallel(true);
        assert_eq!(cfg.targets, vec!["a-team.md".to_string()]);
        assert_eq!(cfg.team_kind, "squad");
        assert!(cfg.parallel);
    }

    #[test]
    fn load_missing_file() {
        let err = AuditConfig::load("/nonexistent/teamkit.toml").unwrap_err();
        assert!(matches!(err, AuditError::ConfigIo { .. }));
    }
}
