//! Report source types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A dated report file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name, used as the section title
    pub name: String,

    /// Full path to the file
    pub path: PathBuf,

    /// Date extracted from the file name
    pub date: NaiveDate,
}

impl SourceFile {
    /// Create a new source file.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            date,
        }
    }
}

/// The normalized text of one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContent {
    /// Where the text came from
    pub source: SourceFile,

    /// Non-empty, trimmed, tag-free lines
    pub lines: Vec<String>,
}

impl ReportContent {
    /// Create report content from already normalized lines.
    pub fn new(source: SourceFile, lines: Vec<String>) -> Self {
        Self { source, lines }
    }

    /// Check if the report has no text.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
