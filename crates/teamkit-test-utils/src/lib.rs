//! Testing utilities for Teamkit workspace
//!
//! Shared recipe fixtures and a temporary recipe directory.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;
use teamkit_recipe::RecipeDocument;

/// Team recipe missing every shared template and one role-scoped key
pub const LAW_FIRM_TEAM: &str = "\
---
id: law-firm-team
name: Law Firm Team
kind: team
files:
  - path: SOUL.md
    template: soul
  - path: TOOLS.md
    template: tools
agents:
  - role: lead
    name: Managing Partner
  - role: paralegal
    name: Paralegal
templates:
  lead.soul: |
    # SOUL.md

    You run the firm.
  paralegal.soul: |
    # SOUL.md
---
# Law Firm Team

Scaffolds a small legal practice.
";

/// Team recipe fully covered by shared and role-scoped templates
pub const CLINIC_TEAM: &str = "\
---
id: clinic-team
kind: team
files:
  - path: TOOLS.md
    template: tools
  - path: STATUS.md
    template: status
  - path: NOTES.md
    template: notes
agents:
  - role: lead
  - role: intake
templates:
  tools: |
    # TOOLS.md
  status: |
    # STATUS.md
  notes: |
    # NOTES.md
---
# Clinic Team
";

/// Single-agent recipe without a templates section
pub const SOLO_AGENT: &str = "\
---
id: solo
kind: agent
files:
  - path: TOOLS.md
    template: tools
agents:
  - role: lead
---
# Solo
";

/// Recipe whose frontmatter is not valid YAML
pub const BROKEN_TEAM: &str = "\
---
kind: team
files: [unclosed
templates:
---
";

pub fn document(id: &str, text: &str) -> RecipeDocument {
    RecipeDocument::new(id, text)
}

/// Temporary recipe directory removed on drop
pub struct RecipeDir {
    dir: TempDir,
}

impl RecipeDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Directory populated with the fixture recipes
    pub fn with_fixtures() -> Self {
        Self::new()
            .with_recipe("law-firm-team.md", LAW_FIRM_TEAM)
            .with_recipe("clinic-team.md", CLINIC_TEAM)
            .with_recipe("solo-agent.md", SOLO_AGENT)
            .with_recipe("broken-team.md", BROKEN_TEAM)
    }

    pub fn with_recipe(self, name: &str, text: &str) -> Self {
        std::fs::write(self.path().join(name), text).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.file(name)).unwrap()
    }

    pub fn modified(&self, name: &str) -> SystemTime {
        std::fs::metadata(self.file(name))
            .and_then(|m| m.modified())
            .unwrap()
    }
}

impl Default for RecipeDir {
    fn default() -> Self {
        Self::new()
    }
}
