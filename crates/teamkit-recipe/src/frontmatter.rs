//! Frontmatter extraction
//!
//! Isolates the leading `---` delimited YAML block of a recipe document.
//! Both delimiters must be full lines; a `---` embedded in content or a
//! longer rule such as `----` never closes the block.

use std::ops::Range;

/// Delimiter line content
pub const DELIMITER: &str = "---";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Frontmatter block borrowed from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    body: &'a str,
    range: Range<usize>,
}

impl<'a> Frontmatter<'a> {
    /// Text strictly between the delimiter lines
    #[inline]
    #[must_use]
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Byte range of the body inside the source text
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// Frontmatter extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterExtractor;

impl FrontmatterExtractor {
    /// Create new extractor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Locate the frontmatter block of `text`
    ///
    /// Returns `None` when the text does not open with a delimiter line
    /// (after any byte-order marks) or when no closing delimiter line
    /// follows.
    #[must_use]
    pub fn extract<'a>(&self, text: &'a str) -> Option<Frontmatter<'a>> {
        let offset = text.len() - text.trim_start_matches(BYTE_ORDER_MARK).len();
        let rest = &text[offset..];

        let first_nl = rest.find('\n')?;
        if rest[..first_nl].trim_end() != DELIMITER {
            return None;
        }

        let start = offset + first_nl + 1;
        let mut pos = start;
        for line in text[start..].split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            if content.trim_end() == DELIMITER {
                return Some(Frontmatter {
                    body: &text[start..pos],
                    range: start..pos,
                });
            }
            pos += line.len();
        }

        None
    }
}
