//! Human-readable and JSON reports
//!
//! Coverage reports group problems by recipe in scan order and sort each
//! group by (role, key).

use crate::batch::{DocumentFailure, PatchReport, PatchStatus, ScanReport};
use crate::coverage::CoverageProblem;
use serde::Serialize;
use std::fmt::Write as _;

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Coverage check found nothing
    Clean,
    /// Coverage check found at least one problem
    ProblemsFound,
    /// Patch run changed no document
    Unchanged,
    /// Patch run changed at least one document
    Changed,
}

impl Outcome {
    /// Process exit code
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Clean | Self::Unchanged => 0,
            Self::ProblemsFound => 2,
            Self::Changed => 3,
        }
    }
}

/// Problems of one recipe, sorted by (role, key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeProblems<'a> {
    /// Recipe identifier
    pub recipe: &'a str,
    /// Sorted problems
    pub problems: Vec<&'a CoverageProblem>,
}

/// Group problems per recipe, skipping recipes without any
#[must_use]
pub fn group_problems(report: &ScanReport) -> Vec<RecipeProblems<'_>> {
    report
        .documents
        .iter()
        .filter(|d| !d.problems().is_empty())
        .map(|d| {
            let mut problems: Vec<_> = d.problems().iter().collect();
            problems.sort_by(|a, b| (&a.role, &a.missing_key).cmp(&(&b.role, &b.missing_key)));
            RecipeProblems {
                recipe: d.recipe(),
                problems,
            }
        })
        .collect()
}

/// Render the coverage report as text
#[must_use]
pub fn render_scan(report: &ScanReport) -> String {
    let total = report.total_problems();
    if total == 0 {
        return "OK: no missing per-role templates found\n".to_string();
    }

    let mut out = String::new();
    for group in group_problems(report) {
        let _ = writeln!(out, "\n{}", group.recipe);
        for problem in group.problems {
            let _ = writeln!(out, "  - {problem}");
        }
    }
    let _ = writeln!(out, "\nTotal missing templates: {total}");
    out
}

#[derive(Serialize)]
struct JsonScan<'a> {
    outcome: Outcome,
    total: usize,
    recipes: Vec<RecipeProblems<'a>>,
    failures: Vec<&'a DocumentFailure>,
}

/// Render the coverage report as pretty JSON
///
/// # Errors
/// Serialization errors from `serde_json`.
pub fn render_scan_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonScan {
        outcome: report.outcome(),
        total: report.total_problems(),
        recipes: group_problems(report),
        failures: report.failures().collect(),
    })
}

/// Render the patch report, one line per target
#[must_use]
pub fn render_patch(report: &PatchReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let _ = match &entry.status {
            PatchStatus::Patched { .. } => writeln!(out, "patched: {}", entry.recipe),
            PatchStatus::WouldPatch { missing } => {
                writeln!(out, "would patch: {} (missing {})", entry.recipe, missing.join(", "))
            }
            PatchStatus::Skipped(_) | PatchStatus::NotFound => {
                writeln!(out, "skip: {}", entry.recipe)
            }
            PatchStatus::Failed(failure) => {
                writeln!(out, "failed: {} ({})", entry.recipe, failure.error)
            }
        };
    }
    out
}
