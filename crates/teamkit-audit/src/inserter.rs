//! Shared template insertion
//!
//! Adds the canonical shared template block to a team recipe's
//! `templates:` mapping. The patch is text surgery, not a YAML round trip:
//! everything outside the inserted block is preserved byte for byte.
//!
//! # Rules
//!
//! - The anchor is a `templates:` line inside the frontmatter. Without one
//!   the document is left alone; a `templates:` section is never invented.
//! - A key counts as present when a `  <key>: |` line exists anywhere in the
//!   document. When every block key is present nothing changes.
//! - Otherwise the whole block is inserted after the anchor line, separated
//!   from it by one blank line. Keys are never inserted one by one.

use crate::shared_block::{SharedTemplateBlock, SHARED_TEMPLATES};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use teamkit_recipe::FrontmatterExtractor;

static TEMPLATES_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^templates:[ \t\r]*$").expect("anchor pattern is valid"));

/// Why a patch did or did not change a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchDecision {
    /// Block inserted; lists the keys that were missing
    Inserted {
        /// Block keys absent before the patch
        missing: Vec<&'static str>,
    },
    /// Every block key was already defined
    AlreadyCovered,
    /// Frontmatter has no `templates:` line
    NoAnchor,
    /// Document has no frontmatter
    NoFrontmatter,
}

impl PatchDecision {
    /// Short label for reports
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inserted { .. } => "inserted shared templates",
            Self::AlreadyCovered => "shared templates present",
            Self::NoAnchor => "no templates section",
            Self::NoFrontmatter => "no frontmatter",
        }
    }
}

/// Result of patching one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome<'a> {
    /// Document text after the patch; borrowed when unchanged
    pub text: Cow<'a, str>,
    /// What happened
    pub decision: PatchDecision,
}

impl PatchOutcome<'_> {
    /// Whether the text differs from the input
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self.decision, PatchDecision::Inserted { .. })
    }

    /// Take the resulting text
    #[must_use]
    pub fn into_text(self) -> String {
        self.text.into_owned()
    }
}

/// Inserts a shared template block into recipe documents
#[derive(Debug, Clone)]
pub struct TemplateInserter {
    block: SharedTemplateBlock,
    key_lines: Vec<(&'static str, Regex)>,
}

impl Default for TemplateInserter {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateInserter {
    /// Create inserter for the canonical shared templates
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_block(SHARED_TEMPLATES)
    }

    /// Create inserter for another block
    #[must_use]
    pub fn with_block(block: SharedTemplateBlock) -> Self {
        let key_lines = block
            .keys()
            .iter()
            .map(|key| {
                let pattern = format!(r"(?m)^  {}:[ \t]*\|[ \t\r]*$", regex::escape(key));
                let re = Regex::new(&pattern).expect("escaped key pattern is valid");
                (*key, re)
            })
            .collect();
        Self { block, key_lines }
    }

    /// Block this inserter writes
    #[inline]
    #[must_use]
    pub fn block(&self) -> &SharedTemplateBlock {
        &self.block
    }

    /// Block keys without a `  <key>: |` line in `text`, in block order
    #[must_use]
    pub fn missing_keys(&self, text: &str) -> Vec<&'static str> {
        self.key_lines
            .iter()
            .filter(|(_, re)| !re.is_match(text))
            .map(|(key, _)| *key)
            .collect()
    }

    /// Byte offset just past the anchor line and its line break
    #[must_use]
    pub fn anchor_end(text: &str) -> Option<usize> {
        let range = FrontmatterExtractor.extract(text)?.range();
        TEMPLATES_ANCHOR
            .find(&text[range.clone()])
            .map(|m| past_line_break(text, range.start + m.end()))
    }

    /// Patch `text`, inserting the block when any of its keys is missing
    #[must_use]
    pub fn patch<'a>(&self, text: &'a str) -> PatchOutcome<'a> {
        let unchanged = |decision| PatchOutcome {
            text: Cow::Borrowed(text),
            decision,
        };

        let Some(frontmatter) = FrontmatterExtractor.extract(text) else {
            return unchanged(PatchDecision::NoFrontmatter);
        };
        let range = frontmatter.range();
        let Some(anchor) = TEMPLATES_ANCHOR.find(&text[range.clone()]) else {
            return unchanged(PatchDecision::NoAnchor);
        };

        let missing = self.missing_keys(text);
        if missing.is_empty() {
            return unchanged(PatchDecision::AlreadyCovered);
        }

        let line_end = range.start + anchor.end();
        let at = past_line_break(text, line_end);
        let block = self.block.text();
        let mut patched = String::with_capacity(text.len() + block.len() + 2);
        patched.push_str(&text[..at]);
        if at == line_end {
            patched.push('\n');
        }
        patched.push('\n');
        patched.push_str(block);
        patched.push_str(&text[at..]);

        PatchOutcome {
            text: Cow::Owned(patched),
            decision: PatchDecision::Inserted { missing },
        }
    }
}

fn past_line_break(text: &str, line_end: usize) -> usize {
    if text[line_end..].starts_with('\n') {
        line_end + 1
    } else {
        line_end
    }
}
