//! Report text normalization.
//!
//! Markup is removed textually: every substring from `<` to the next `>` is
//! deleted, with no attempt to interpret tags or entities.

use std::borrow::Cow;
use std::fs;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::{Config, ErrorMode};
use crate::error::{Error, Result};
use crate::model::{ReportContent, SourceFile};

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Options for normalizing report text.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,
}

impl NormalizeOptions {
    /// Take the options from a build configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            normalize_unicode: config.normalize_unicode,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
        }
    }
}

/// Delete every `<...>` substring.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    tag_regex().replace_all(text, "")
}

/// Strip tags from raw report text and split it into paragraph lines.
///
/// Lines are trimmed; lines left empty are dropped.
pub fn normalize_text(raw: &str, options: &NormalizeOptions) -> Vec<String> {
    let stripped = strip_tags(raw);
    let text: Cow<'_, str> = if options.normalize_unicode {
        Cow::Owned(stripped.nfc().collect())
    } else {
        stripped
    };

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read one report and normalize its text.
///
/// # Errors
/// `Error::FileRead` if the file cannot be read or is not valid UTF-8.
pub fn read_report(source: &SourceFile, options: &NormalizeOptions) -> Result<ReportContent> {
    let bytes = fs::read(&source.path).map_err(|e| Error::FileRead {
        path: source.path.clone(),
        reason: e.to_string(),
    })?;
    let raw = String::from_utf8(bytes).map_err(|e| Error::FileRead {
        path: source.path.clone(),
        reason: format!("not valid UTF-8 ({})", e.utf8_error()),
    })?;

    let lines = normalize_text(&raw, options);
    log::debug!("{}: {} lines", source.name, lines.len());
    Ok(ReportContent::new(source.clone(), lines))
}

/// Read every report in order.
///
/// In `ErrorMode::Strict` the first unreadable report aborts the load. In
/// `ErrorMode::Lenient` unreadable reports are left out entirely with a
/// warning; if none remain the load fails with `Error::NoInput`.
pub fn load_reports(sources: &[SourceFile], config: &Config) -> Result<Vec<ReportContent>> {
    let options = NormalizeOptions::from_config(config);
    let mut reports = Vec::with_capacity(sources.len());

    for source in sources {
        match read_report(source, &options) {
            Ok(report) => {
                if report.is_empty() {
                    log::warn!("{} has no text; its section holds only the heading", source.name);
                }
                reports.push(report);
            }
            Err(e @ Error::FileRead { .. }) if config.error_mode == ErrorMode::Lenient => {
                log::warn!("{}; leaving it out", e);
            }
            Err(e) => return Err(e),
        }
    }

    if reports.is_empty() {
        return Err(Error::NoInput {
            dir: config.input_dir.clone(),
        });
    }

    Ok(reports)
}
