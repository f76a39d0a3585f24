//! Two-pass rendering with table of contents reconciliation.
//!
//! A heading's page number is only known once it has been laid out, but the
//! table of contents that lists it comes first. The renderer therefore lays
//! the block sequence out twice:
//!
//! 1. **Discovery**: every [`Block::Heading`] records a [`TocEntry`] with the
//!    page it lands on. The pages of this pass are dropped.
//! 2. **Final**: layout starts over from a fresh state, and the
//!    [`Block::TocPlaceholder`] is filled with the entries recorded by the
//!    discovery pass.
//!
//! There is no third pass. If the final pass places headings on other pages
//! than the discovery pass did, the result reports a stale table of contents.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Block, TocEntry};

use super::layout::{wrap_text, LaidOutPage, PageGeometry, PlacedLine};
use super::style::{Alignment, StyleSheet, TextStyle};

/// Slack for floating point comparisons against the frame height.
const EPSILON: f32 = 0.01;

/// Dot leader unit between an entry and its page number.
const LEADER: &str = " .";

/// Pages and table of contents produced by one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutput {
    /// Laid-out pages
    pub pages: Vec<LaidOutPage>,
    /// One entry per heading, in document order
    pub toc: Vec<TocEntry>,
}

/// Result of the final pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Pages of the final pass
    pub pages: Vec<LaidOutPage>,
    /// Heading pages measured in the final pass
    pub toc: Vec<TocEntry>,
    /// Entries printed in the table of contents (measured in the discovery pass)
    pub index: Vec<TocEntry>,
}

impl Rendered {
    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the printed table of contents disagrees with the final layout.
    pub fn toc_is_stale(&self) -> bool {
        self.index != self.toc
    }
}

/// Layout state owned by a single pass.
struct RenderState<'a> {
    geometry: &'a PageGeometry,
    finished: Vec<LaidOutPage>,
    current: LaidOutPage,
    /// Height used on the current page, from the frame top
    cursor: f32,
    toc: Vec<TocEntry>,
}

impl<'a> RenderState<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: LaidOutPage::new(1),
            cursor: 0.0,
            toc: Vec::new(),
        }
    }

    fn page_number(&self) -> u32 {
        self.current.number
    }

    fn new_page(&mut self) {
        let next = LaidOutPage::new(self.current.number + 1);
        self.finished.push(std::mem::replace(&mut self.current, next));
        self.cursor = 0.0;
    }

    /// Start a new page unless the current one is still empty.
    fn page_break(&mut self) {
        if !self.current.is_empty() {
            self.new_page();
        }
    }

    /// Vertical space; dropped at the top of a page.
    fn add_space(&mut self, amount: f32) {
        if !self.current.is_empty() {
            self.cursor += amount;
        }
    }

    /// Reserve one line, moving to a new page if it does not fit.
    /// Returns the baseline.
    fn reserve_line(&mut self, style: &TextStyle) -> f32 {
        if !self.current.is_empty()
            && self.cursor + style.leading > self.geometry.frame_height() + EPSILON
        {
            self.new_page();
        }
        let baseline = self.geometry.frame_top() - self.cursor - style.size;
        self.cursor += style.leading;
        baseline
    }

    fn push_run(&mut self, text: String, x: f32, y: f32, style: &TextStyle) {
        self.current.lines.push(PlacedLine {
            text,
            x,
            y,
            font: style.font,
            size: style.size,
        });
    }

    /// Wrap and place a block of text. Returns the page of its first line.
    fn place_text(&mut self, text: &str, style: &TextStyle) -> Result<Option<u32>> {
        let frame_width = self.geometry.frame_width();
        let lines = wrap_text(text, style.font, style.size, style.text_width(frame_width))?;
        if lines.is_empty() {
            return Ok(None);
        }

        self.add_space(style.space_before);
        let mut first_page = None;

        for (i, line) in lines.into_iter().enumerate() {
            let y = self.reserve_line(style);
            first_page.get_or_insert(self.page_number());

            let indent = style.left_indent + if i > 0 { style.hanging_indent } else { 0.0 };
            let x = match style.alignment {
                Alignment::Left => self.geometry.frame_left() + indent,
                Alignment::Center => {
                    let line_width = style.font.text_width(&line, style.size);
                    self.geometry.frame_left() + indent + (frame_width - indent - line_width) / 2.0
                }
            };
            self.push_run(line, x, y, style);
        }

        self.add_space(style.space_after);
        Ok(first_page)
    }

    /// Lay out the table of contents section.
    fn place_index(&mut self, entries: &[TocEntry], styles: &StyleSheet) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.add_space(styles.toc_gap);
        for entry in entries {
            self.place_index_entry(entry, &styles.toc_entry)?;
        }
        Ok(())
    }

    /// One entry: wrapped text, dot leaders, right-aligned page number.
    fn place_index_entry(&mut self, entry: &TocEntry, style: &TextStyle) -> Result<()> {
        let font = style.font;
        let frame_left = self.geometry.frame_left();
        let frame_width = self.geometry.frame_width();

        let label = entry.page.to_string();
        let label_width = font.text_width(&label, style.size);
        let label_x = frame_left + frame_width - label_width;
        let space_width = font.text_width(" ", style.size);
        let unit_width = font.text_width(LEADER, style.size);
        let level_indent = f32::from(entry.level) * style.hanging_indent;

        let room = style.text_width(frame_width) - level_indent - label_width - unit_width;
        let mut lines = wrap_text(&entry.text, font, style.size, room)?;
        if lines.is_empty() {
            lines.push(String::new());
        }
        let last = lines.len() - 1;

        self.add_space(style.space_before);
        for (i, line) in lines.into_iter().enumerate() {
            let y = self.reserve_line(style);
            let indent = style.left_indent
                + level_indent
                + if i > 0 { style.hanging_indent } else { 0.0 };
            let x = frame_left + indent;
            let text_end = x + font.text_width(&line, style.size);
            self.push_run(line, x, y, style);

            if i == last {
                let leader_room = label_x - space_width - text_end;
                let units = (leader_room / unit_width).floor().max(0.0) as usize;
                if units > 0 {
                    let leader_x = label_x - space_width - units as f32 * unit_width;
                    self.push_run(LEADER.repeat(units), leader_x, y, style);
                }
                self.push_run(label.clone(), label_x, y, style);
            }
        }
        self.add_space(style.space_after);
        Ok(())
    }

    fn finish(mut self) -> PassOutput {
        if !self.current.is_empty() || self.finished.is_empty() {
            self.finished.push(self.current);
        }
        PassOutput {
            pages: self.finished,
            toc: self.toc,
        }
    }
}

/// Lays out a block sequence onto fixed-size pages in two passes.
#[derive(Debug, Clone)]
pub struct TwoPassRenderer {
    geometry: PageGeometry,
    styles: StyleSheet,
}

impl TwoPassRenderer {
    /// Create a renderer.
    ///
    /// # Errors
    /// `Error::Layout` if a line of any style is taller than the text frame.
    pub fn new(geometry: PageGeometry, styles: StyleSheet) -> Result<Self> {
        let frame_height = geometry.frame_height();
        if let Some(style) = styles.iter().find(|s| s.leading > frame_height) {
            return Err(Error::Layout(format!(
                "{:.1}pt lines do not fit in a {:.1}pt high frame",
                style.leading, frame_height
            )));
        }
        Ok(Self { geometry, styles })
    }

    /// Create a renderer with the geometry of a configuration and default styles.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(PageGeometry::from_config(config)?, StyleSheet::default())
    }

    /// Page geometry.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Run both passes.
    pub fn render(&self, blocks: &[Block]) -> Result<Rendered> {
        let snapshot = self.discover(blocks)?;
        let last = self.finalize(blocks, &snapshot)?;

        debug_assert_eq!(
            last.toc.len(),
            blocks.iter().filter(|b| b.is_heading()).count()
        );

        let rendered = Rendered {
            pages: last.pages,
            toc: last.toc,
            index: snapshot,
        };
        if rendered.toc_is_stale() {
            log::warn!(
                "Table of contents page numbers are stale: headings moved between passes"
            );
        }
        log::info!(
            "Rendered {} pages with {} index entries",
            rendered.page_count(),
            rendered.toc.len()
        );
        Ok(rendered)
    }

    /// Discovery pass: return the page of every heading.
    ///
    /// The placeholder holds one provisional entry per heading, so the index
    /// normally takes as many lines as it will in the final pass.
    pub fn discover(&self, blocks: &[Block]) -> Result<Vec<TocEntry>> {
        let pass = self.render_pass(blocks, &provisional_index(blocks))?;
        log::debug!(
            "Discovery pass: {} pages, {} headings",
            pass.pages.len(),
            pass.toc.len()
        );
        Ok(pass.toc)
    }

    /// Final pass: lay out again, printing `snapshot` as the table of contents.
    pub fn finalize(&self, blocks: &[Block], snapshot: &[TocEntry]) -> Result<PassOutput> {
        self.render_pass(blocks, snapshot)
    }

    /// Lay out `blocks` from a fresh state, filling the placeholder with `index`.
    pub fn render_pass(&self, blocks: &[Block], index: &[TocEntry]) -> Result<PassOutput> {
        let mut state = RenderState::new(&self.geometry);

        for block in blocks {
            match block {
                Block::Title { text } => {
                    state.place_text(text, &self.styles.title)?;
                }
                Block::Heading { text, .. } => {
                    let placed = state.place_text(text, &self.styles.heading)?;
                    if let Some(level) = block.outline_level() {
                        let page = placed.unwrap_or_else(|| state.page_number());
                        state.toc.push(TocEntry::new(level, text.clone(), page));
                    }
                }
                Block::Paragraph { text } => {
                    state.place_text(text, &self.styles.body)?;
                }
                Block::PageBreak => state.page_break(),
                Block::TocPlaceholder => state.place_index(index, &self.styles)?,
            }
        }

        Ok(state.finish())
    }
}

/// One entry per heading, standing in for the real index.
///
/// Each heading is numbered one past the page breaks before it, which is its
/// page when no section overflows. Labels then have their final digit count
/// and wrap as they will in the final pass.
pub fn provisional_index(blocks: &[Block]) -> Vec<TocEntry> {
    let mut breaks = 0;
    let mut entries = Vec::new();

    for block in blocks {
        match block {
            Block::PageBreak => breaks += 1,
            _ => {
                if let (Some(level), Some(text)) = (block.outline_level(), block.text()) {
                    entries.push(TocEntry::new(level, text, breaks + 1));
                }
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::super::font::Font;
    use super::*;
    use crate::config::Margins;

    fn renderer() -> TwoPassRenderer {
        TwoPassRenderer::from_config(&Config::default()).unwrap()
    }

    fn book(reports: &[(&str, &[&str])]) -> Vec<Block> {
        let mut blocks = vec![
            Block::title("Reports"),
            Block::PageBreak,
            Block::title("Index"),
            Block::TocPlaceholder,
            Block::PageBreak,
        ];
        for (name, lines) in reports {
            blocks.push(Block::heading(*name, *name));
            blocks.extend(lines.iter().map(|l| Block::paragraph(*l)));
            blocks.push(Block::PageBreak);
        }
        blocks
    }

    fn pages_of(toc: &[TocEntry]) -> Vec<u32> {
        toc.iter().map(|e| e.page).collect()
    }

    #[test]
    fn test_render_one_section_per_page() {
        let blocks = book(&[
            ("B_2023-12-31.txt", &["first"][..]),
            ("A_2024-01-05.txt", &["second"][..]),
            ("C_2024-01-05.txt", &["third"][..]),
        ]);
        let rendered = renderer().render(&blocks).unwrap();

        // Title page, index page, three sections; no blank trailing page
        assert_eq!(rendered.page_count(), 5);
        assert_eq!(pages_of(&rendered.toc), vec![3, 4, 5]);
        assert!(!rendered.toc_is_stale());

        let texts: Vec<_> = rendered.toc.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["B_2023-12-31.txt", "A_2024-01-05.txt", "C_2024-01-05.txt"]
        );
        assert!(rendered.toc.iter().all(|e| e.level == 0));
    }

    #[test]
    fn test_index_printed_with_page_numbers() {
        let blocks = book(&[("a.txt", &["x"][..]), ("b.txt", &["y"][..])]);
        let rendered = renderer().render(&blocks).unwrap();

        let index_page = &rendered.pages[1];
        assert!(index_page.contains("Index"));
        assert!(index_page.contains("a.txt"));
        assert!(index_page.contains("b.txt"));
        assert!(index_page.lines.iter().any(|l| l.text == "3"));
        assert!(index_page.lines.iter().any(|l| l.text == "4"));
        assert!(index_page.lines.iter().any(|l| l.text.starts_with(" .")));
    }

    #[test]
    fn test_heading_pages_match_final_layout() {
        let blocks = book(&[("a.txt", &["x"][..]), ("b.txt", &["y"][..])]);
        let rendered = renderer().render(&blocks).unwrap();

        for entry in &rendered.toc {
            let page = &rendered.pages[(entry.page - 1) as usize];
            assert_eq!(page.number, entry.page);
            assert_eq!(page.lines[0].text, entry.text);
        }
    }

    #[test]
    fn test_only_headings_are_indexed() {
        let blocks = vec![
            Block::title("Title"),
            Block::paragraph("body"),
            Block::PageBreak,
            Block::paragraph("more"),
        ];
        let rendered = renderer().render(&blocks).unwrap();
        assert!(rendered.toc.is_empty());
        assert_eq!(rendered.page_count(), 2);
    }

    #[test]
    fn test_heading_pushed_to_next_page() {
        // Frame is 160pt high: heading takes 28pt, ten body lines 120pt
        let geometry = PageGeometry::new(300.0, 200.0, Margins::uniform(20.0)).unwrap();
        let renderer = TwoPassRenderer::new(geometry, StyleSheet::default()).unwrap();

        let mut blocks = vec![Block::heading("H1", "h1")];
        blocks.extend((0..10).map(|i| Block::paragraph(format!("line {}", i))));
        blocks.push(Block::heading("H2", "h2"));

        let rendered = renderer.render(&blocks).unwrap();
        assert_eq!(pages_of(&rendered.toc), vec![1, 2]);
        assert_eq!(rendered.pages[1].lines[0].text, "H2");
    }

    #[test]
    fn test_paragraph_splits_across_pages() {
        let geometry = PageGeometry::new(300.0, 200.0, Margins::uniform(20.0)).unwrap();
        let renderer = TwoPassRenderer::new(geometry, StyleSheet::default()).unwrap();

        let blocks: Vec<_> = (0..30)
            .map(|i| Block::paragraph(format!("line {}", i)))
            .collect();
        let rendered = renderer.render(&blocks).unwrap();

        // 13 lines of 12pt fit in 160pt
        assert_eq!(rendered.page_count(), 3);
        assert_eq!(rendered.pages[0].lines.len(), 13);
        for page in &rendered.pages {
            for line in &page.lines {
                assert!(line.y >= 20.0 - 1e-3);
            }
        }
    }

    #[test]
    fn test_long_index_shifts_sections() {
        let names: Vec<String> = (1..=60)
            .map(|i| format!("report_{:03}_2024-01-01.txt", i))
            .collect();
        let reports: Vec<(&str, &[&str])> = names
            .iter()
            .map(|n| (n.as_str(), &["body"][..]))
            .collect();
        let blocks = book(&reports);

        let rendered = renderer().render(&blocks).unwrap();

        // The index needs two pages, so sections start on page 4
        assert_eq!(rendered.toc[0].page, 4);
        assert_eq!(rendered.toc[59].page, 63);
        assert!(!rendered.toc_is_stale());
        assert_eq!(rendered.index, rendered.toc);
    }

    #[test]
    fn test_final_pass_ignores_discovery_pages() {
        // 100 body lines overflow one A4 page, so b.txt moves from its
        // estimated page 4 to page 5
        let long: Vec<String> = (0..100).map(|i| format!("line {}", i)).collect();
        let long: Vec<&str> = long.iter().map(String::as_str).collect();
        let blocks = book(&[("a.txt", &long[..]), ("b.txt", &["z"][..])]);
        let untouched = blocks.clone();
        let renderer = renderer();

        let mut discovery = renderer
            .render_pass(&blocks, &provisional_index(&blocks))
            .unwrap();
        let discovery_index_page = discovery.pages[1].clone();
        assert_eq!(pages_of(&discovery.toc), vec![3, 5]);

        for page in &mut discovery.pages {
            page.lines.clear();
            page.number = 999;
        }
        discovery.pages.push(LaidOutPage::new(1000));

        let last = renderer.finalize(&blocks, &discovery.toc).unwrap();
        let reference = renderer.render(&untouched).unwrap();
        assert_eq!(last.pages, reference.pages);
        assert_eq!(last.toc, reference.toc);
        assert!(!reference.toc_is_stale());

        let numbers: Vec<u32> = last.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=last.pages.len() as u32).collect::<Vec<_>>());
        assert!(last.pages.iter().all(|p| !p.is_empty()));

        // The index now prints measured pages, not the estimates
        assert_ne!(last.pages[1], discovery_index_page);
        assert!(discovery_index_page.lines.iter().any(|l| l.text == "4"));
        assert!(last.pages[1].lines.iter().any(|l| l.text == "5"));
    }

    #[test]
    fn test_provisional_index_matches_two_digit_pages() {
        let names: Vec<String> = (1..=12).map(|i| format!("r{:02}_2024-01-01.txt", i)).collect();
        let reports: Vec<(&str, &[&str])> = names
            .iter()
            .map(|n| (n.as_str(), &["body"][..]))
            .collect();
        let blocks = book(&reports);

        let rendered = renderer().render(&blocks).unwrap();
        assert_eq!(provisional_index(&blocks), rendered.toc);
        assert_eq!(rendered.toc[11].page, 14);
        assert!(!rendered.toc_is_stale());
    }

    #[test]
    fn test_finalize_prints_given_snapshot() {
        let blocks = book(&[("a.txt", &["x"][..])]);
        let snapshot = vec![TocEntry::new(0, "a.txt", 42)];
        let last = renderer().finalize(&blocks, &snapshot).unwrap();

        assert!(last.pages[1].lines.iter().any(|l| l.text == "42"));
        assert_eq!(pages_of(&last.toc), vec![3]);
    }

    #[test]
    fn test_stale_detection() {
        let rendered = Rendered {
            pages: vec![LaidOutPage::new(1)],
            toc: vec![TocEntry::new(0, "a", 3)],
            index: vec![TocEntry::new(0, "a", 2)],
        };
        assert!(rendered.toc_is_stale());
    }

    #[test]
    fn test_long_heading_wraps_in_index() {
        let long = "weekly status report with a very long descriptive name that keeps going and going 2024-01-01.txt";
        let blocks = book(&[(long, &["x"][..])]);
        let rendered = renderer().render(&blocks).unwrap();

        let index_page = &rendered.pages[1];
        let label = index_page.lines.iter().find(|l| l.text == "3").unwrap();
        let frame_right = 595.28 - Margins::default().right;
        assert!((label.x + Font::Helvetica.text_width("3", 12.0) - frame_right).abs() < 0.01);
        assert!(index_page.lines.len() >= 4);
    }

    #[test]
    fn test_unfittable_character_is_layout_error() {
        let geometry = PageGeometry::new(30.0, 200.0, Margins::uniform(13.0)).unwrap();
        let renderer = TwoPassRenderer::new(geometry, StyleSheet::default()).unwrap();
        let err = renderer.render(&[Block::paragraph("W")]).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn test_frame_lower_than_line_rejected() {
        let geometry = PageGeometry::new(300.0, 30.0, Margins::uniform(10.0)).unwrap();
        let err = TwoPassRenderer::new(geometry, StyleSheet::default()).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn test_provisional_index() {
        let blocks = book(&[("a.txt", &[][..]), ("b.txt", &[][..])]);
        let index = provisional_index(&blocks);
        assert_eq!(index, vec![TocEntry::new(0, "a.txt", 3), TocEntry::new(0, "b.txt", 4)]);
    }
}
