//! Batch processing over a recipe directory
//!
//! Each document is read, checked or patched, and reported independently.
//! A document that fails to read or parse is recorded as a failure and the
//! batch carries on; only an unreadable recipe directory aborts a run.

use crate::config::AuditConfig;
use crate::coverage::{CoverageChecker, CoverageProblem};
use crate::error::{AuditError, AuditResult};
use crate::inserter::{PatchDecision, TemplateInserter};
use crate::report::Outcome;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use teamkit_recipe::{ConfigParser, RecipeDocument, RecipeError, YamlConfigParser};

/// How documents are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelection {
    /// The configured `targets` list
    Fixed,
    /// Every file in the directory ending with `discover_suffix`
    Discover,
}

/// Whether a patch run writes documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// Replace changed documents on disk
    Write,
    /// Report what would change, write nothing
    DryRun,
}

/// A document the batch could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// Recipe identifier
    pub recipe: String,
    /// Rendered error
    pub error: String,
}

impl DocumentFailure {
    fn new(recipe: impl Into<String>, error: &RecipeError) -> Self {
        Self {
            recipe: recipe.into(),
            error: error.to_string(),
        }
    }
}

/// Coverage result of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentScan {
    /// Frontmatter parsed and checked; out-of-scope kinds have no problems
    Checked {
        /// Recipe identifier
        recipe: String,
        /// Unresolved obligations, declaration order
        problems: Vec<CoverageProblem>,
    },
    /// Document has no frontmatter
    NoFrontmatter {
        /// Recipe identifier
        recipe: String,
    },
    /// Document could not be read or parsed
    Failed(DocumentFailure),
}

impl DocumentScan {
    /// Recipe identifier
    #[must_use]
    pub fn recipe(&self) -> &str {
        match self {
            Self::Checked { recipe, .. } | Self::NoFrontmatter { recipe } => recipe,
            Self::Failed(failure) => &failure.recipe,
        }
    }

    /// Problems found in this document
    #[must_use]
    pub fn problems(&self) -> &[CoverageProblem] {
        match self {
            Self::Checked { problems, .. } => problems,
            _ => &[],
        }
    }
}

/// Coverage results of a batch, in target order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Per-document results
    pub documents: Vec<DocumentScan>,
}

impl ScanReport {
    /// All problems, grouped by document in scan order
    pub fn problems(&self) -> impl Iterator<Item = &CoverageProblem> {
        self.documents.iter().flat_map(DocumentScan::problems)
    }

    /// Number of problems across all documents
    #[must_use]
    pub fn total_problems(&self) -> usize {
        self.problems().count()
    }

    /// Documents that could not be processed
    pub fn failures(&self) -> impl Iterator<Item = &DocumentFailure> {
        self.documents.iter().filter_map(|d| match d {
            DocumentScan::Failed(failure) => Some(failure),
            _ => None,
        })
    }

    /// Process outcome of the scan
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.total_problems() == 0 {
            Outcome::Clean
        } else {
            Outcome::ProblemsFound
        }
    }
}

/// Patch status of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchStatus {
    /// Block inserted and written
    Patched {
        /// Keys that were missing
        missing: Vec<&'static str>,
    },
    /// Block would be inserted (dry run)
    WouldPatch {
        /// Keys that are missing
        missing: Vec<&'static str>,
    },
    /// Nothing to do
    Skipped(PatchDecision),
    /// Document not on disk
    NotFound,
    /// Read or write failed
    Failed(DocumentFailure),
}

/// Patch result of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEntry {
    /// Recipe identifier
    pub recipe: String,
    /// What happened
    pub status: PatchStatus,
}

impl PatchEntry {
    /// Whether the document changed, or would change in a dry run
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(
            self.status,
            PatchStatus::Patched { .. } | PatchStatus::WouldPatch { .. }
        )
    }
}

/// Patch results of a batch, in target order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Per-document results
    pub entries: Vec<PatchEntry>,
}

impl PatchReport {
    /// Number of changed documents
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.changed()).count()
    }

    /// Process outcome of the patch run
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.changed_count() == 0 {
            Outcome::Unchanged
        } else {
            Outcome::Changed
        }
    }
}

/// Runs coverage checks and patches over a recipe directory
#[derive(Debug, Clone)]
pub struct RecipeBatch {
    config: AuditConfig,
    parser: YamlConfigParser,
    checker: CoverageChecker,
    inserter: TemplateInserter,
}

impl RecipeBatch {
    /// Create batch for `config`
    #[must_use]
    pub fn new(config: AuditConfig) -> Self {
        let checker = CoverageChecker::with_team_kind(config.team_kind.clone());
        Self {
            config,
            parser: YamlConfigParser::new(),
            checker,
            inserter: TemplateInserter::new(),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Paths of the documents to process
    ///
    /// Fixed targets are returned in configured order whether or not they
    /// exist; discovered ones are sorted by file name.
    ///
    /// # Errors
    /// `AuditError::RecipeDir` if the recipe directory cannot be read.
    pub fn targets(&self, selection: TargetSelection) -> AuditResult<Vec<PathBuf>> {
        let dir = &self.config.recipe_dir;
        let dir_error = |source: std::io::Error| AuditError::RecipeDir {
            path: dir.clone(),
            source,
        };

        match selection {
            TargetSelection::Fixed => {
                std::fs::metadata(dir).map_err(dir_error)?;
                Ok(self.config.targets.iter().map(|t| dir.join(t)).collect())
            }
            TargetSelection::Discover => {
                let mut paths = Vec::new();
                for entry in std::fs::read_dir(dir).map_err(dir_error)? {
                    let path = entry.map_err(dir_error)?.path();
                    let matches = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(&self.config.discover_suffix));
                    if matches && path.is_file() {
                        paths.push(path);
                    }
                }
                paths.sort();
                Ok(paths)
            }
        }
    }

    /// Check coverage of every selected document
    ///
    /// # Errors
    /// `AuditError::RecipeDir` if the recipe directory cannot be read.
    pub fn scan(&self, selection: TargetSelection) -> AuditResult<ScanReport> {
        let paths: Vec<PathBuf> = self
            .targets(selection)?
            .into_iter()
            .filter(|p| exists_or_log(p))
            .collect();

        let documents = self.map_paths(&paths, |path| match RecipeDocument::read(path) {
            Ok(doc) => self.scan_document(&doc),
            Err(err) => {
                let recipe = recipe_id(path);
                tracing::warn!(recipe = %recipe, error = %err, "skipping unreadable recipe");
                DocumentScan::Failed(DocumentFailure::new(recipe, &err))
            }
        });

        let report = ScanReport { documents };
        tracing::info!(
            documents = report.documents.len(),
            problems = report.total_problems(),
            "coverage scan finished"
        );
        Ok(report)
    }

    /// Check coverage of one document
    #[must_use]
    pub fn scan_document(&self, doc: &RecipeDocument) -> DocumentScan {
        let recipe = doc.id().to_owned();
        match doc.config_with(&self.parser) {
            Ok(config) => {
                let problems = self.checker.check(&recipe, &config);
                tracing::debug!(recipe = %recipe, problems = problems.len(), "checked");
                DocumentScan::Checked { recipe, problems }
            }
            Err(RecipeError::MissingFrontmatter) => {
                tracing::debug!(recipe = %recipe, "no frontmatter");
                DocumentScan::NoFrontmatter { recipe }
            }
            Err(err) => {
                tracing::warn!(
                    recipe = %recipe,
                    parser = self.parser.name(),
                    error = %err,
                    "skipping recipe"
                );
                DocumentScan::Failed(DocumentFailure::new(recipe, &err))
            }
        }
    }

    /// Insert the shared templates into every configured target
    ///
    /// # Errors
    /// `AuditError::RecipeDir` if the recipe directory cannot be read.
    pub fn patch(&self, mode: PatchMode) -> AuditResult<PatchReport> {
        let paths = self.targets(TargetSelection::Fixed)?;
        let entries = self.map_paths(&paths, |path| self.patch_path(path, mode));

        let report = PatchReport { entries };
        tracing::info!(
            documents = report.entries.len(),
            changed = report.changed_count(),
            ?mode,
            "patch run finished"
        );
        Ok(report)
    }

    /// Patch one document on disk
    ///
    /// The file is only written when its text changes.
    #[must_use]
    pub fn patch_path(&self, path: &Path, mode: PatchMode) -> PatchEntry {
        let recipe = recipe_id(path);
        if !exists_or_log(path) {
            return PatchEntry {
                recipe,
                status: PatchStatus::NotFound,
            };
        }

        let failed = |err: RecipeError| {
            tracing::warn!(recipe = %recipe, error = %err, "patch failed");
            PatchStatus::Failed(DocumentFailure::new(recipe.clone(), &err))
        };

        let status = match RecipeDocument::read(path) {
            Err(err) => failed(err),
            Ok(doc) => {
                let outcome = self.inserter.patch(doc.text());
                match (outcome.decision, mode) {
                    (PatchDecision::Inserted { missing }, PatchMode::DryRun) => {
                        PatchStatus::WouldPatch { missing }
                    }
                    (PatchDecision::Inserted { missing }, PatchMode::Write) => {
                        match std::fs::write(path, outcome.text.as_bytes()) {
                            Ok(()) => {
                                tracing::info!(
                                    recipe = %recipe,
                                    ?missing,
                                    block_version = self.inserter.block().version(),
                                    "inserted shared templates"
                                );
                                PatchStatus::Patched { missing }
                            }
                            Err(source) => failed(RecipeError::io_error(path, source)),
                        }
                    }
                    (decision, _) => {
                        tracing::debug!(recipe = %recipe, reason = decision.label(), "unchanged");
                        PatchStatus::Skipped(decision)
                    }
                }
            }
        };

        PatchEntry { recipe, status }
    }

    fn map_paths<T, F>(&self, paths: &[PathBuf], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&Path) -> T + Sync,
    {
        if self.config.parallel {
            paths.par_iter().map(|p| f(p)).collect()
        } else {
            paths.iter().map(|p| f(p)).collect()
        }
    }
}

fn recipe_id(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn exists_or_log(path: &Path) -> bool {
    let exists = path.is_file();
    if !exists {
        tracing::debug!(path = %path.display(), "target not found");
    }
    exists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> RecipeBatch {
        RecipeBatch::new(AuditConfig::new())
    }

    #[test]
    fn scan_document_without_frontmatter() {
        let doc = RecipeDocument::new("notes.md", "# no frontmatter\n");
        assert_eq!(
            batch().scan_document(&doc),
            DocumentScan::NoFrontmatter {
                recipe: "notes.md".to_string()
            }
        );
    }

    #[test]
    fn scan_document_with_bad_yaml() {
        let doc = RecipeDocument::new("bad-team.md", "---\nkind: team\nfiles: [\n---\n");
        let scan = batch().scan_document(&doc);
        assert!(matches!(&scan, DocumentScan::Failed(f) if f.recipe == "bad-team.md"));
        assert!(scan.problems().is_empty());
    }

    #[test]
    fn scan_document_with_bad_shape() {
        let doc = RecipeDocument::new("shape-team.md", "---\nkind: team\ntemplates: [a]\n---\n");
        let scan = batch().scan_document(&doc);
        let DocumentScan::Failed(failure) = &scan else {
            panic!("expected failure, got {scan:?}");
        };
        assert!(failure.error.contains("templates"));
    }

    #[test]
    fn scan_document_reports_problems() {
        let doc = RecipeDocument::new(
            "ops-team.md",
            "---\nkind: team\nfiles:\n  - template: tools\nagents:\n  - role: lead\n---\n",
        );
        let scan = batch().scan_document(&doc);
        assert_eq!(scan.recipe(), "ops-team.md");
        assert_eq!(scan.problems().len(), 1);
        assert_eq!(scan.problems()[0].missing_key, "lead.tools");
    }

    #[test]
    fn report_outcomes() {
        let clean = ScanReport::default();
        assert_eq!(clean.outcome(), Outcome::Clean);

        let dirty = ScanReport {
            documents: vec![DocumentScan::Checked {
                recipe: "a".to_string(),
                problems: vec![CoverageProblem {
                    recipe: "a".to_string(),
                    role: "lead".to_string(),
                    missing_key: "lead.x".to_string(),
                }],
            }],
        };
        assert_eq!(dirty.outcome(), Outcome::ProblemsFound);

        let unchanged = PatchReport {
            entries: vec![PatchEntry {
                recipe: "a".to_string(),
                status: PatchStatus::Skipped(PatchDecision::NoAnchor),
            }],
        };
        assert_eq!(unchanged.outcome(), Outcome::Unchanged);
    }

    #[test]
    fn missing_recipe_dir_is_fatal() {
        let batch = RecipeBatch::new(AuditConfig::new().with_recipe_dir("/nonexistent/recipes"));
        assert!(matches!(
            batch.scan(TargetSelection::Discover),
            Err(AuditError::RecipeDir { .. })
        ));
        assert!(matches!(
            batch.patch(PatchMode::Write),
            Err(AuditError::RecipeDir { .. })
        ));
    }
}
