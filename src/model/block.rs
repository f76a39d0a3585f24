//! Logical document blocks.

use serde::{Deserialize, Serialize};

/// A logical block of the assembled document.
///
/// The renderer lays blocks out in order. Only [`Block::Heading`] is indexed
/// by the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A centered title (title page, index heading)
    Title {
        /// Title text
        text: String,
    },

    /// A top-level section heading
    Heading {
        /// Heading text
        text: String,
        /// Name of the report the section comes from
        source_id: String,
    },

    /// A paragraph of body text
    Paragraph {
        /// Paragraph text
        text: String,
    },

    /// Forced page break
    PageBreak,

    /// Where the table of contents goes
    TocPlaceholder,
}

impl Block {
    /// Create a title block.
    pub fn title(text: impl Into<String>) -> Self {
        Block::Title { text: text.into() }
    }

    /// Create a heading block.
    pub fn heading(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Block::Heading {
            text: text.into(),
            source_id: source_id.into(),
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Outline level of the block, if the table of contents indexes it.
    pub fn outline_level(&self) -> Option<u8> {
        match self {
            Block::Heading { .. } => Some(0),
            _ => None,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.outline_level().is_some()
    }

    /// Get the text carried by the block, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Title { text } | Block::Heading { text, .. } | Block::Paragraph { text } => {
                Some(text.as_str())
            }
            Block::PageBreak | Block::TocPlaceholder => None,
        }
    }
}
