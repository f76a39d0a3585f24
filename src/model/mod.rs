//! Document model types for report books.
//!
//! Reports are discovered as [`SourceFile`]s, read into [`ReportContent`],
//! and assembled into an ordered sequence of [`Block`]s. Rendering a
//! [`Block::Heading`] produces a [`TocEntry`].

mod block;
mod source;
mod toc;

pub use block::Block;
pub use source::{ReportContent, SourceFile};
pub use toc::TocEntry;
