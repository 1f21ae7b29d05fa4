//! Recipe documents
//!
//! A `RecipeDocument` is the immutable text of one recipe file. Parsing and
//! patching never mutate it; a patch produces a new text.

use crate::config::RecipeConfig;
use crate::error::{RecipeError, RecipeResult};
use crate::frontmatter::{Frontmatter, FrontmatterExtractor};
use crate::parser::{ConfigParser, YamlConfigParser};
use std::path::Path;

/// Raw recipe document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDocument {
    id: String,
    text: String,
}

impl RecipeDocument {
    /// Create document from its identifier and text
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Read document from disk; the identifier is the file name
    ///
    /// # Errors
    /// `RecipeError::Io` if the file cannot be read as UTF-8 text.
    pub fn read(path: impl AsRef<Path>) -> RecipeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RecipeError::io_error(path, e))?;
        let id = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { id, text })
    }

    /// Document identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Frontmatter block, if any
    #[inline]
    #[must_use]
    pub fn frontmatter(&self) -> Option<Frontmatter<'_>> {
        FrontmatterExtractor.extract(&self.text)
    }

    /// Parse the frontmatter with `parser`
    ///
    /// # Errors
    /// - `RecipeError::MissingFrontmatter` if there is no block
    /// - `RecipeError::Parse` if the block is not a mapping
    /// - `RecipeError::Shape` if a container has the wrong type
    pub fn config_with<P: ConfigParser + ?Sized>(&self, parser: &P) -> RecipeResult<RecipeConfig> {
        let frontmatter = self.frontmatter().ok_or(RecipeError::MissingFrontmatter)?;
        let map = parser.parse_mapping(frontmatter.body())?;
        RecipeConfig::from_mapping(&map)
    }

    /// Parse the frontmatter as YAML
    ///
    /// # Errors
    /// See [`RecipeDocument::config_with`].
    pub fn config(&self) -> RecipeResult<RecipeConfig> {
        self.config_with(&YamlConfigParser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEAM_KIND;

    #[test]
    fn config_from_frontmatter() {
        let doc = RecipeDocument::new(
            "clinic-team.md",
            "---\nkind: team\nagents:\n  - role: lead\n---\n# Clinic\n",
        );
        let cfg = doc.config().unwrap();
        assert!(cfg.is_kind(TEAM_KIND));
        assert_eq!(cfg.agents.len(), 1);
        assert_eq!(doc.id(), "clinic-team.md");
    }

    #[test]
    fn missing_frontmatter() {
        let doc = RecipeDocument::new("README.md", "# Just markdown\n");
        assert!(doc.frontmatter().is_none());
        assert!(matches!(doc.config(), Err(RecipeError::MissingFrontmatter)));
    }

    #[test]
    fn parse_error_surfaces() {
        let doc = RecipeDocument::new("bad.md", "---\nkind: [team\n---\n");
        assert!(matches!(doc.config(), Err(RecipeError::Parse { .. })));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = RecipeDocument::read("/nonexistent/recipes/none-team.md").unwrap_err();
        assert!(matches!(err, RecipeError::Io { .. }));
    }
}
