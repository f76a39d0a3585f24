//! Error types for reportbook.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reportbook operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a report book.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No file in the input directory carries a usable date.
    #[error("No dated report files found in {}", dir.display())]
    NoInput {
        /// Directory that was scanned
        dir: PathBuf,
    },

    /// A filename contains a date-like substring that is not a calendar date.
    #[error("Invalid date '{value}' in file name '{name}'")]
    DateParse {
        /// File name
        name: String,
        /// The matched substring
        value: String,
    },

    /// A selected report could not be read.
    #[error("Cannot read report {}: {reason}", path.display())]
    FileRead {
        /// Path of the report
        path: PathBuf,
        /// Why the read failed
        reason: String,
    },

    /// Content cannot be laid out on the configured page geometry.
    #[error("Layout error: {0}")]
    Layout(String),

    /// The configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error while building or serializing the PDF.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error reading a JSON configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}
