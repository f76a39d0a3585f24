//! Page geometry, line breaking and laid-out pages.

use crate::config::{Config, Margins};
use crate::error::{Error, Result};

use super::font::Font;

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Margins around the text frame
    pub margins: Margins,
}

impl PageGeometry {
    /// Create a geometry, checking that the text frame has a positive size.
    pub fn new(width: f32, height: f32, margins: Margins) -> Result<Self> {
        let geometry = Self {
            width,
            height,
            margins,
        };
        if !(geometry.frame_width() > 0.0 && geometry.frame_height() > 0.0) {
            return Err(Error::Layout(format!(
                "margins leave no room on a {:.1}x{:.1}pt page",
                width, height
            )));
        }
        Ok(geometry)
    }

    /// Geometry from the page size and margins of a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (width, height) = config.page_size.dimensions();
        Self::new(width, height, config.margins)
    }

    /// Width of the text frame.
    pub fn frame_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Height of the text frame.
    pub fn frame_height(&self) -> f32 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// X coordinate of the frame's left edge.
    pub fn frame_left(&self) -> f32 {
        self.margins.left
    }

    /// Y coordinate of the frame's top edge (PDF origin is bottom-left).
    pub fn frame_top(&self) -> f32 {
        self.height - self.margins.top
    }
}

/// A run of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Text of the run
    pub text: String,
    /// X of the run's start
    pub x: f32,
    /// Baseline Y
    pub y: f32,
    /// Font face
    pub font: Font,
    /// Font size
    pub size: f32,
}

/// One page of a finished pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Text runs in drawing order
    pub lines: Vec<PlacedLine>,
}

impl LaidOutPage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            lines: Vec::new(),
        }
    }

    /// Check if nothing has been placed on the page.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check if any run on the page contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }
}

/// Break `text` into lines no wider than `width` points.
///
/// Words are packed greedily; a word wider than the line is broken between
/// characters.
///
/// # Errors
/// `Error::Layout` if `width` is not positive or a single character does not fit.
pub fn wrap_text(text: &str, font: Font, size: f32, width: f32) -> Result<Vec<String>> {
    if !(width > 0.0) {
        return Err(Error::Layout(format!(
            "no horizontal room ({:.1}pt) for text '{}'",
            width,
            truncate(text)
        )));
    }

    let space = font.text_width(" ", size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = break_word(word, font, size, width)?;
            // The last piece can still take following words
            if let Some((piece, piece_width)) = pieces.pop() {
                lines.extend(pieces.into_iter().map(|(p, _)| p));
                current = piece;
                current_width = piece_width;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

fn break_word(word: &str, font: Font, size: f32, width: f32) -> Result<Vec<(String, f32)>> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0;

    for c in word.chars() {
        let char_width = font.char_width(c) as f32 * size / 1000.0;
        if char_width > width {
            return Err(Error::Layout(format!(
                "character '{}' ({:.1}pt) is wider than the {:.1}pt line",
                c, char_width, width
            )));
        }
        if piece_width + char_width > width {
            pieces.push((std::mem::take(&mut piece), piece_width));
            piece_width = 0.0;
        }
        piece.push(c);
        piece_width += char_width;
    }

    if !piece.is_empty() {
        pieces.push((piece, piece_width));
    }
    Ok(pieces)
}

fn truncate(text: &str) -> String {
    text.chars().take(40).collect()
}
