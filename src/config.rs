//! Build configuration.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// PostScript points per centimetre.
pub const POINTS_PER_CM: f32 = 72.0 / 2.54;

/// Pattern matching an ISO date anywhere in a file name.
///
/// ASCII digits only: `\d` would also match other scripts' digits, which
/// `chrono` cannot parse.
pub const DEFAULT_DATE_PATTERN: &str = r"([0-9]{4}-[0-9]{2}-[0-9]{2})";

/// `chrono` format used to parse the captured date.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Title page template. `{min}`, `{max}` and `{today}` are substituted.
pub const DEFAULT_TITLE_TEMPLATE: &str = "Reports from {min} to {max}, generated on {today}.";

/// Heading shown above the table of contents.
pub const DEFAULT_INDEX_TITLE: &str = "Report Index";

/// Options for building a report book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for reports
    pub input_dir: PathBuf,

    /// Destination PDF
    pub output_path: PathBuf,

    /// Page size
    pub page_size: PageSize,

    /// Page margins in points
    pub margins: Margins,

    /// Regex locating the date in a file name (first capture group is parsed)
    pub date_pattern: String,

    /// `chrono` format of the captured date
    pub date_format: String,

    /// Title page template
    pub title_template: String,

    /// Heading of the index page
    pub index_title: String,

    /// File extension of reports, compared case-insensitively
    pub extension: String,

    /// What to do with reports that cannot be read
    pub error_mode: ErrorMode,

    /// Normalize report text to Unicode NFC
    pub normalize_unicode: bool,
}

impl Config {
    /// Create a configuration for the given input directory and destination.
    pub fn new(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the destination path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the date pattern and the format of its first capture group.
    pub fn with_date_pattern(
        mut self,
        pattern: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        self.date_pattern = pattern.into();
        self.date_format = format.into();
        self
    }

    /// Set the title page template.
    pub fn with_title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = template.into();
        self
    }

    /// Set the index heading.
    pub fn with_index_title(mut self, title: impl Into<String>) -> Self {
        self.index_title = title.into();
        self
    }

    /// Set the report file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Set the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip unreadable reports instead of aborting.
    pub fn lenient(self) -> Self {
        self.with_error_mode(ErrorMode::Lenient)
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Compile the date pattern.
    pub fn date_regex(&self) -> Result<Regex> {
        let regex = Regex::new(&self.date_pattern).map_err(|e| {
            Error::InvalidConfig(format!("date pattern '{}': {}", self.date_pattern, e))
        })?;
        if regex.captures_len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "date pattern '{}' needs a capture group around the date",
                self.date_pattern
            )));
        }
        Ok(regex)
    }

    /// Check the configuration for values that can never work.
    pub fn validate(&self) -> Result<()> {
        self.date_regex()?;

        let (width, height) = self.page_size.dimensions();
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "page size {}x{} must be positive",
                width, height
            )));
        }

        let m = &self.margins;
        if [m.top, m.right, m.bottom, m.left].iter().any(|v| *v < 0.0) {
            return Err(Error::InvalidConfig("margins must not be negative".into()));
        }

        if self.extension.is_empty() {
            return Err(Error::InvalidConfig("extension must not be empty".into()));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_path: PathBuf::from("reports.pdf"),
            page_size: PageSize::A4,
            margins: Margins::default(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
            index_title: DEFAULT_INDEX_TITLE.to_string(),
            extension: "txt".to_string(),
            error_mode: ErrorMode::Strict,
            normalize_unicode: true,
        }
    }
}

/// Page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// ISO A4 (210 x 297 mm)
    #[default]
    A4,
    /// US Letter (8.5 x 11 inches)
    Letter,
    /// Arbitrary size
    Custom {
        /// Width in points
        width: f32,
        /// Height in points
        height: f32,
    },
}

impl PageSize {
    /// Get (width, height) in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match *self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margins {
    /// Same margin on all four sides.
    pub fn uniform(points: f32) -> Self {
        Self {
            top: points,
            right: points,
            bottom: points,
            left: points,
        }
    }

    /// Same margin on all four sides, given in centimetres.
    pub fn cm(cm: f32) -> Self {
        Self::uniform(cm * POINTS_PER_CM)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::cm(2.0)
    }
}

/// How unreadable reports are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Abort the build
    #[default]
    Strict,
    /// Leave the report out and log a warning
    Lenient,
}
