//! Report discovery: find dated files and order them chronologically.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::SourceFile;

/// Extracts the embedded date from a file name.
#[derive(Debug, Clone)]
pub struct DateMatcher {
    regex: Regex,
    format: String,
}

impl DateMatcher {
    /// Create a matcher from a pattern with one capture group and a `chrono` format.
    pub fn new(pattern: &str, format: impl Into<String>) -> Result<Self> {
        let config = Config::default().with_date_pattern(pattern, format);
        Self::from_config(&config)
    }

    /// Create the matcher described by a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            regex: config.date_regex()?,
            format: config.date_format.clone(),
        })
    }

    /// Extract the date from a file name.
    ///
    /// # Returns
    /// * `Ok(None)` if the name contains no date-like substring
    /// * `Ok(Some(date))` for the first match when it is a calendar date
    /// * `Err(Error::DateParse)` if the first match is not a valid date
    pub fn extract(&self, name: &str) -> Result<Option<NaiveDate>> {
        let Some(value) = self
            .regex
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            return Ok(None);
        };

        NaiveDate::parse_from_str(value, &self.format)
            .map(Some)
            .map_err(|_| Error::DateParse {
                name: name.to_string(),
                value: value.to_string(),
            })
    }
}

/// Find the dated reports in `dir`, oldest first.
///
/// Files are listed in file name order, filtered by extension, and stably
/// sorted by date, so reports sharing a date keep their listing order.
///
/// # Errors
/// * `Error::NoInput` if no file carries a valid date
/// * `Error::Io` if the directory cannot be listed
///
/// # Example
/// ```no_run
/// use reportbook::{locate_reports, Config};
///
/// let config = Config::new("./reports", "book.pdf");
/// for report in locate_reports(&config.input_dir, &config)? {
///     println!("{} {}", report.date, report.name);
/// }
/// # Ok::<(), reportbook::Error>(())
/// ```
pub fn locate_reports<P: AsRef<Path>>(dir: P, config: &Config) -> Result<Vec<SourceFile>> {
    let dir = dir.as_ref();
    let matcher = DateMatcher::from_config(config)?;

    let mut names = list_candidates(dir, &config.extension)?;
    names.sort();
    log::debug!("{} candidate files in {}", names.len(), dir.display());

    let sources = order_reports(dir, names, &matcher);
    if sources.is_empty() {
        return Err(Error::NoInput {
            dir: dir.to_path_buf(),
        });
    }

    log::info!("Found {} dated reports in {}", sources.len(), dir.display());
    Ok(sources)
}

/// Keep the dated names and sort them by date, preserving the given order on ties.
pub fn order_reports<I>(dir: &Path, names: I, matcher: &DateMatcher) -> Vec<SourceFile>
where
    I: IntoIterator<Item = String>,
{
    let mut sources = Vec::new();

    for name in names {
        match matcher.extract(&name) {
            Ok(Some(date)) => {
                let path = dir.join(&name);
                sources.push(SourceFile::new(name, path, date));
            }
            Ok(None) => log::debug!("Skipping undated file {}", name),
            Err(e) => log::warn!("{}; skipping", e),
        }
    }

    // sort_by_key is stable
    sources.sort_by_key(|source| source.date);
    sources
}

/// List regular files in `dir` whose extension matches, case-insensitively.
fn list_candidates(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, extension) {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("Skipping non UTF-8 file name {:?}", raw),
        }
    }

    Ok(names)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
