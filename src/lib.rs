//! # reportbook
//!
//! Bind a directory of date-named plain-text reports into one paginated PDF
//! with a title page and a table of contents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reportbook::{compile, Config};
//!
//! fn main() -> reportbook::Result<()> {
//!     let config = Config::new("./reports", "./reports.pdf");
//!     let summary = compile(&config)?;
//!     println!("PDF written: {}", summary.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`locate_reports`]: find `*.txt` files with a `YYYY-MM-DD` date in the
//!   name and sort them by date (stable on ties)
//! - [`load_reports`]: read each file, strip `<...>` tags, keep non-empty lines
//! - [`assemble`]: title page, index page, one section per report
//! - [`TwoPassRenderer`]: lay out twice so the index shows final page numbers
//! - [`write_pdf`] and [`persist`]: serialize and atomically write the output

pub mod assemble;
pub mod config;
pub mod error;
pub mod locate;
pub mod model;
pub mod normalize;
pub mod render;

pub use assemble::{assemble, date_range, render_title};
pub use config::{Config, ErrorMode, Margins, PageSize};
pub use error::{Error, Result};
pub use locate::{locate_reports, DateMatcher};
pub use model::{Block, ReportContent, SourceFile, TocEntry};
pub use normalize::{load_reports, normalize_text, read_report, strip_tags, NormalizeOptions};
pub use render::{write_pdf, PdfInfo, Rendered, TwoPassRenderer};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileSummary {
    /// Where the PDF was written
    pub output_path: PathBuf,
    /// Number of reports bound
    pub report_count: usize,
    /// Number of pages in the PDF
    pub page_count: u32,
    /// Final heading pages
    pub toc: Vec<TocEntry>,
    /// Whether the printed index disagrees with the final layout
    pub stale_toc: bool,
}

/// A report book laid out and serialized, but not yet written.
#[derive(Debug, Clone)]
pub struct RenderedBook {
    /// Assembled block sequence
    pub blocks: Vec<Block>,
    /// Final pass
    pub rendered: Rendered,
    /// PDF bytes
    pub pdf: Vec<u8>,
}

/// Build the report book described by `config`, dated today.
pub fn compile(config: &Config) -> Result<CompileSummary> {
    compile_with_date(config, Local::now().date_naive())
}

/// Build the report book with an explicit generation date.
///
/// Nothing is written unless every step succeeds; on error the destination is
/// left untouched.
pub fn compile_with_date(config: &Config, generated_on: NaiveDate) -> Result<CompileSummary> {
    config.validate()?;
    let renderer = TwoPassRenderer::from_config(config)?;

    let sources = locate_reports(&config.input_dir, config)?;
    let reports = load_reports(&sources, config)?;
    let book = render_book(&reports, config, &renderer, generated_on)?;

    persist(&book.pdf, &config.output_path)?;
    log::info!(
        "Wrote {} ({} pages, {} reports)",
        config.output_path.display(),
        book.rendered.page_count(),
        reports.len()
    );

    Ok(CompileSummary {
        output_path: config.output_path.clone(),
        report_count: reports.len(),
        page_count: book.rendered.page_count(),
        stale_toc: book.rendered.toc_is_stale(),
        toc: book.rendered.toc,
    })
}

/// Assemble, lay out and serialize loaded reports.
pub fn render_book(
    reports: &[ReportContent],
    config: &Config,
    renderer: &TwoPassRenderer,
    generated_on: NaiveDate,
) -> Result<RenderedBook> {
    let blocks = assemble(reports, config, generated_on)?;
    let rendered = renderer.render(&blocks)?;

    let title = blocks
        .first()
        .and_then(Block::text)
        .unwrap_or_default()
        .to_string();
    let pdf = write_pdf(&rendered, renderer.geometry(), &PdfInfo::new(title))?;

    Ok(RenderedBook {
        blocks,
        rendered,
        pdf,
    })
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The destination only changes once the whole file has been written.
pub fn persist(bytes: &[u8], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
