//! Template coverage checking
//!
//! Every role of a team recipe scaffolds every file of the recipe, so each
//! (role, template) pair needs a body. A pair is covered when `templates`
//! defines the shared key `<template>`, or failing that the role-scoped key
//! `<role>.<template>`. Only key existence matters; bodies are never read.

use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;
use teamkit_recipe::{role_scoped_key, RecipeConfig, TEAM_KIND};

/// A (role, template) pair that must resolve to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoverageObligation<'a> {
    /// Agent role
    pub role: &'a str,
    /// Template name referenced by a file entry
    pub template: &'a str,
}

impl CoverageObligation<'_> {
    /// Role-scoped key that would satisfy this obligation
    #[must_use]
    pub fn role_key(&self) -> String {
        role_scoped_key(self.role, self.template)
    }
}

/// An obligation no template key satisfies
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CoverageProblem {
    /// Recipe identifier
    pub recipe: String,
    /// Agent role
    pub role: String,
    /// Missing role-scoped key, `<role>.<template>`
    pub missing_key: String,
}

impl fmt::Display for CoverageProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role={}: missing templates.{}", self.role, self.missing_key)
    }
}

/// Checks per-role template coverage of team recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageChecker {
    team_kind: String,
}

impl Default for CoverageChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverageChecker {
    /// Create checker for recipes tagged `kind: team`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_team_kind(TEAM_KIND)
    }

    /// Create checker for a custom team tag
    #[must_use]
    pub fn with_team_kind(team_kind: impl Into<String>) -> Self {
        Self {
            team_kind: team_kind.into(),
        }
    }

    /// Tag a recipe must carry to be checked
    #[inline]
    #[must_use]
    pub fn team_kind(&self) -> &str {
        &self.team_kind
    }

    /// Obligations of `config`, role-major in declaration order
    ///
    /// Roles and template names are trimmed, blank ones dropped, and
    /// duplicates collapse onto their first occurrence.
    pub fn obligations<'a>(
        &self,
        config: &'a RecipeConfig,
    ) -> impl Iterator<Item = CoverageObligation<'a>> + 'a {
        let templates: IndexSet<&str> = config
            .files
            .iter()
            .filter_map(|f| non_blank(f.template.as_deref()))
            .collect();
        let roles: IndexSet<&str> = config
            .agents
            .iter()
            .filter_map(|a| non_blank(a.role.as_deref()))
            .collect();

        roles.into_iter().flat_map(move |role| {
            templates
                .clone()
                .into_iter()
                .map(move |template| CoverageObligation { role, template })
        })
    }

    /// Whether `obligation` resolves through the shared or role-scoped key
    #[must_use]
    pub fn is_covered(config: &RecipeConfig, obligation: &CoverageObligation<'_>) -> bool {
        config.has_template(obligation.template) || config.has_template(&obligation.role_key())
    }

    /// Unresolved obligations of `config`, reported against `recipe`
    ///
    /// Recipes of another kind are out of scope and yield nothing. Output
    /// order is deterministic: roles in declaration order, then template
    /// names in declaration order.
    #[must_use]
    pub fn check(&self, recipe: &str, config: &RecipeConfig) -> Vec<CoverageProblem> {
        if !config.is_kind(&self.team_kind) {
            tracing::debug!(recipe, kind = ?config.kind, "not a team recipe");
            return Vec::new();
        }

        self.obligations(config)
            .filter(|obligation| !Self::is_covered(config, obligation))
            .map(|obligation| CoverageProblem {
                recipe: recipe.to_owned(),
                role: obligation.role.to_owned(),
                missing_key: obligation.role_key(),
            })
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
