//! Canonical shared fallback templates
//!
//! The block is a literal, not generated: the inserter writes it byte for
//! byte, and its idempotence check looks for exactly the key lines it
//! contains. Bump `version` whenever `text` changes.

/// Versioned block of shared template definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedTemplateBlock {
    version: u32,
    keys: &'static [&'static str],
    text: &'static str,
}

/// Shared `tools`, `status` and `notes` templates
pub const SHARED_TEMPLATES: SharedTemplateBlock = SharedTemplateBlock {
    version: 1,
    keys: &["tools", "status", "notes"],
    text: concat!(
        "  tools: |\n",
        "    # TOOLS.md\n",
        "\n",
        "    # Agent-local notes (paths, conventions, env quirks).\n",
        "\n",
        "  status: |\n",
        "    # STATUS.md\n",
        "\n",
        "    - (empty)\n",
        "\n",
        "  notes: |\n",
        "    # NOTES.md\n",
        "\n",
        "    - (empty)\n",
    ),
};

impl SharedTemplateBlock {
    /// Block revision
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Template keys defined by the block, in block order
    #[inline]
    #[must_use]
    pub const fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    /// Block text, indented for a top-level `templates:` mapping
    #[inline]
    #[must_use]
    pub const fn text(&self) -> &'static str {
        self.text
    }

    /// Header line introducing `key` as a block scalar
    #[must_use]
    pub fn key_line(key: &str) -> String {
        format!("  {key}: |")
    }
}
