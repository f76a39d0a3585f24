//! Text styles used by the renderer.

use super::font::Font;

/// Horizontal alignment of a line within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush left
    #[default]
    Left,
    /// Centered
    Center,
}

/// How a kind of block is set.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font face
    pub font: Font,
    /// Font size in points
    pub size: f32,
    /// Baseline-to-baseline distance in points
    pub leading: f32,
    /// Space above the block, dropped at the top of a page
    pub space_before: f32,
    /// Space below the block
    pub space_after: f32,
    /// Indent of every line
    pub left_indent: f32,
    /// Additional indent of wrapped lines
    pub hanging_indent: f32,
    /// Alignment
    pub alignment: Alignment,
}

impl TextStyle {
    /// Create a left-aligned style with leading 1.2 times the size.
    pub fn new(font: Font, size: f32) -> Self {
        Self {
            font,
            size,
            leading: size * 1.2,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
            hanging_indent: 0.0,
            alignment: Alignment::Left,
        }
    }

    /// Set the leading.
    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    /// Set the space before and after the block.
    pub fn with_spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    /// Set the left and hanging indents.
    pub fn with_indent(mut self, left: f32, hanging: f32) -> Self {
        self.left_indent = left;
        self.hanging_indent = hanging;
        self
    }

    /// Center lines in the frame.
    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    /// Width available to text in a frame of `frame_width`.
    pub fn text_width(&self, frame_width: f32) -> f32 {
        frame_width - self.left_indent - self.hanging_indent
    }
}

/// Styles for every block kind.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    /// Title page and index heading
    pub title: TextStyle,
    /// Section headings
    pub heading: TextStyle,
    /// Body paragraphs
    pub body: TextStyle,
    /// Table of contents lines
    pub toc_entry: TextStyle,
    /// Gap between the index heading and the first entry
    pub toc_gap: f32,
}

impl StyleSheet {
    /// All styles, for geometry checks.
    pub fn iter(&self) -> impl Iterator<Item = &TextStyle> {
        [&self.title, &self.heading, &self.body, &self.toc_entry].into_iter()
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            title: TextStyle::new(Font::HelveticaBold, 18.0)
                .with_leading(22.0)
                .with_spacing(0.0, 6.0)
                .centered(),
            heading: TextStyle::new(Font::HelveticaBold, 14.0)
                .with_leading(16.0)
                .with_spacing(10.0, 12.0),
            body: TextStyle::new(Font::Helvetica, 10.0).with_leading(12.0),
            toc_entry: TextStyle::new(Font::Helvetica, 12.0)
                .with_leading(14.0)
                .with_spacing(5.0, 0.0)
                .with_indent(0.0, 20.0),
            toc_gap: 0.5 * crate::config::POINTS_PER_CM,
        }
    }
}
