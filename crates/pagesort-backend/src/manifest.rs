//! Manifest loading.
//!
//! A manifest is a small CSV file with one row per page range:
//!
//! ```csv
//! date,from,to
//! 2024-03-05,1,3
//! 2024-01-12,4,7
//! ```
//!
//! Columns are positional: sort date, first page, last page. Extra
//! columns are ignored. Rows keep their 1-based file line number so
//! validation findings and parse errors point back at the file.

use chrono::NaiveDate;
use pagesort_core::{PagesortError, RangeRecord, Result};
use std::path::Path;

/// Date formats tried in order when no explicit format is configured.
/// `%y` must come before `%Y`: chrono's `%Y` also consumes two-digit
/// years, turning `03/12/24` into year 0024, while `%y` leaves a
/// four-digit year's trailing digits unconsumed and fails cleanly.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Options controlling how a manifest file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOptions {
    /// Whether the first line is a header row to skip
    pub has_headers: bool,

    /// Field delimiter
    pub delimiter: u8,

    /// Explicit chrono date format. When set, only this format is
    /// accepted; when unset the common formats are tried in turn.
    pub date_format: Option<String>,
}

impl ManifestOptions {
    /// Create options for a comma-separated manifest with a header row.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
            date_format: None,
        }
    }

    /// Set whether the first line is a header row.
    #[inline]
    #[must_use = "returns options with the header setting configured"]
    pub const fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Set the field delimiter.
    #[inline]
    #[must_use = "returns options with a delimiter configured"]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Accept only the given chrono date format.
    #[must_use = "returns options with a date format configured"]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and parse a manifest file into range records.
///
/// # Errors
///
/// Returns [`PagesortError::ManifestRead`] if the file cannot be read
/// and [`PagesortError::ManifestParse`] for the first row that cannot
/// be turned into a record.
pub fn load_manifest<P: AsRef<Path>>(path: P, options: &ManifestOptions) -> Result<Vec<RangeRecord>> {
    let path_ref = path.as_ref();
    let data = std::fs::read(path_ref).map_err(|e| PagesortError::ManifestRead {
        path: path_ref.to_path_buf(),
        message: e.to_string(),
    })?;

    let records = parse_manifest(&data, options)?;
    log::info!(
        "loaded {} range(s) from {}",
        records.len(),
        path_ref.display()
    );
    Ok(records)
}

/// Parse manifest content into range records.
///
/// Row numbers in the returned records and in errors are 1-based file
/// lines, counting the header when there is one, so the first data row
/// of a headed manifest is row 2.
///
/// # Errors
///
/// Returns [`PagesortError::ManifestParse`] for the first row with a
/// missing column, an unreadable page number, or an unrecognized date.
pub fn parse_manifest(data: &[u8], options: &ManifestOptions) -> Result<Vec<RangeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .has_headers(options.has_headers)
        .from_reader(data);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| PagesortError::ManifestParse {
            row: e.position().map_or(0, csv::Position::line),
            message: e.to_string(),
        })?;
        let row = record.position().map_or(0, csv::Position::line);

        let sort_key = parse_sort_key(
            field(&record, 0, "date", row)?,
            options.date_format.as_deref(),
            row,
        )?;
        let page_from = parse_page(field(&record, 1, "first page", row)?, "first page", row)?;
        let page_to = parse_page(field(&record, 2, "last page", row)?, "last page", row)?;

        records.push(RangeRecord::new(sort_key, page_from, page_to, row));
    }

    Ok(records)
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str, row: u64) -> Result<&'a str> {
    match record.get(index).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(PagesortError::ManifestParse {
            row,
            message: format!("missing {name} column"),
        }),
    }
}

fn parse_sort_key(value: &str, format: Option<&str>, row: u64) -> Result<NaiveDate> {
    if let Some(format) = format {
        return NaiveDate::parse_from_str(value, format).map_err(|_| {
            PagesortError::ManifestParse {
                row,
                message: format!("date '{value}' does not match format '{format}'"),
            }
        });
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    Err(PagesortError::ManifestParse {
        row,
        message: format!("unrecognized date '{value}'"),
    })
}

fn parse_page(value: &str, name: &str, row: u64) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| PagesortError::ManifestParse {
            row,
            message: format!("invalid {name} '{value}'"),
        })
}
