//! Typed recipe configuration
//!
//! `RecipeConfig` is built from a parsed frontmatter mapping. Only the keys
//! the audit reasons about are read: `kind`, `files`, `agents` and
//! `templates`. Everything else in the mapping is ignored.

use crate::error::{RecipeError, RecipeResult};
use crate::parser::value_kind;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Kind tag of team recipes
pub const TEAM_KIND: &str = "team";

/// File scaffolded for every agent of a team
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// Target path relative to the agent workspace
    pub path: Option<String>,
    /// Template name used to render the file
    pub template: Option<String>,
}

impl FileEntry {
    /// Create entry rendering `template`
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            path: None,
            template: Some(template.into()),
        }
    }
}

/// Agent declared by a team
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentEntry {
    /// Role archetype, e.g. `lead`
    pub role: Option<String>,
    /// Display name
    pub name: Option<String>,
}

impl AgentEntry {
    /// Create agent with `role`
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            name: None,
        }
    }
}

/// Parsed recipe frontmatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeConfig {
    /// Kind tag, stringified when given as a non-string scalar
    pub kind: Option<String>,
    /// File entries in declaration order
    pub files: Vec<FileEntry>,
    /// Agent entries in declaration order
    pub agents: Vec<AgentEntry>,
    /// Template key to body; `None` when the body is not a string
    pub templates: IndexMap<String, Option<String>>,
}

impl RecipeConfig {
    /// Build config from a top-level frontmatter mapping
    ///
    /// Missing or `null` containers are empty. Sequence items that are not
    /// mappings are skipped, as are non-string template keys.
    ///
    /// # Errors
    /// `RecipeError::Shape` when `files` or `agents` is not a sequence, or
    /// `templates` is not a mapping.
    pub fn from_mapping(map: &Mapping) -> RecipeResult<Self> {
        let kind = map.get("kind").and_then(scalar_to_string);

        let files = sequence_items(map, "files")?
            .map(|entry| FileEntry {
                path: string_field(entry, "path"),
                template: string_field(entry, "template"),
            })
            .collect();

        let agents = sequence_items(map, "agents")?
            .map(|entry| AgentEntry {
                role: string_field(entry, "role"),
                name: string_field(entry, "name"),
            })
            .collect();

        let templates = match map.get("templates") {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Mapping(entries)) => entries
                .iter()
                .filter_map(|(key, body)| {
                    let key = key.as_str()?;
                    Some((key.to_owned(), body.as_str().map(ToOwned::to_owned)))
                })
                .collect(),
            Some(other) => {
                tracing::debug!(found = value_kind(other), "templates is not a mapping");
                return Err(RecipeError::shape("templates", "a mapping"));
            }
        };

        Ok(Self {
            kind,
            files,
            agents,
            templates,
        })
    }

    /// Start a config of the given kind
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Add a file entry
    #[must_use]
    pub fn with_file(mut self, file: FileEntry) -> Self {
        self.files.push(file);
        self
    }

    /// Add an agent entry
    #[must_use]
    pub fn with_agent(mut self, agent: AgentEntry) -> Self {
        self.agents.push(agent);
        self
    }

    /// Add a template
    #[must_use]
    pub fn with_template(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.templates.insert(key.into(), Some(body.into()));
        self
    }

    /// Whether the kind tag equals `tag`
    #[inline]
    #[must_use]
    pub fn is_kind(&self, tag: &str) -> bool {
        self.kind.as_deref() == Some(tag)
    }

    /// Whether `templates` defines `key`, whatever its body
    #[inline]
    #[must_use]
    pub fn has_template(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Body of `key` when it is a string
    #[must_use]
    pub fn template_body(&self, key: &str) -> Option<&str> {
        self.templates.get(key)?.as_deref()
    }

    /// Body used to scaffold template `name` for `role`
    ///
    /// The role-scoped `<role>.<name>` body wins over the shared `<name>` one.
    #[must_use]
    pub fn resolve_template(&self, role: &str, name: &str) -> Option<&str> {
        self.template_body(&role_scoped_key(role, name))
            .or_else(|| self.template_body(name))
    }
}

/// Role-scoped template key `<role>.<name>`
#[inline]
#[must_use]
pub fn role_scoped_key(role: &str, name: &str) -> String {
    format!("{role}.{name}")
}

fn sequence_items<'a>(
    map: &'a Mapping,
    field: &'static str,
) -> RecipeResult<impl Iterator<Item = &'a Mapping>> {
    let items: &[Value] = match map.get(field) {
        None | Some(Value::Null) => &[],
        Some(Value::Sequence(items)) => items,
        Some(other) => {
            tracing::debug!(field, found = value_kind(other), "expected a sequence");
            return Err(RecipeError::shape(field, "a sequence"));
        }
    };
    Ok(items.iter().filter_map(Value::as_mapping))
}

fn string_field(entry: &Mapping, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
