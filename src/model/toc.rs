//! Table of contents entries.

use serde::{Deserialize, Serialize};

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Outline level (0 = top-level section)
    pub level: u8,

    /// Heading text
    pub text: String,

    /// Page the heading was laid out on (1-indexed)
    pub page: u32,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(level: u8, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}
