//! CSV source parsing.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use super::{CatalogError, TorrentRecord};

/// Columns every source file must carry.
const REQUIRED_COLUMNS: [&str; 6] = ["title", "dt", "cat", "size", "imdb", "hash"];

/// Accepted naive timestamp layouts; `%.f` also matches a missing fraction.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A row as it appears in the CSV, before field conversion.
#[derive(Debug, Deserialize)]
struct SourceRow {
    title: String,
    dt: String,
    cat: String,
    size: Option<String>,
    imdb: Option<String>,
    hash: String,
}

impl SourceRow {
    fn into_record(self) -> Result<TorrentRecord, String> {
        let dt = parse_timestamp(&self.dt).ok_or_else(|| format!("invalid dt '{}'", self.dt))?;
        let size = match self.size.as_deref() {
            Some(raw) => parse_size(raw)?,
            None => None,
        };
        let imdb = self.imdb.filter(|id| !id.trim().is_empty());

        Ok(TorrentRecord {
            title: self.title,
            dt,
            cat: self.cat,
            size,
            imdb,
            hash: self.hash,
        })
    }
}

/// Parse a timestamp in any of the layouts the dump (or a user) may use.
///
/// RFC 3339 values with an offset are converted to UTC; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Sizes are integers, but dumps written by float-typed tools carry `1234.0`.
fn parse_size(raw: &str) -> Result<Option<u64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(bytes) = raw.parse::<u64>() {
        return Ok(Some(bytes));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            Ok(Some(value as u64))
        }
        _ => Err(format!("invalid size '{}'", raw)),
    }
}

fn csv_error(e: csv::Error) -> CatalogError {
    let line = e.position().map(|p| p.line());
    match (e.kind(), line) {
        (csv::ErrorKind::Io(_), _) | (_, None) => CatalogError::Source(e.to_string()),
        (_, Some(line)) => CatalogError::MalformedRecord {
            line,
            reason: e.to_string(),
        },
    }
}

/// Parse CSV records from any reader.
///
/// Any row that fails to parse fails the whole call; a partial catalog is
/// never returned.
pub fn parse_records<R: io::Read>(input: R) -> Result<Vec<TorrentRecord>, CatalogError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().map_err(csv_error)?.clone();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h.trim() == **column))
    {
        return Err(CatalogError::MalformedRecord {
            line: 1,
            reason: format!("missing column '{}'", missing),
        });
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        let raw: SourceRow =
            row.deserialize(Some(&headers))
                .map_err(|e| CatalogError::MalformedRecord {
                    line,
                    reason: e.to_string(),
                })?;
        let record = raw
            .into_record()
            .map_err(|reason| CatalogError::MalformedRecord { line, reason })?;
        records.push(record);
    }

    Ok(records)
}

/// Read and parse the catalog source file.
pub fn read_source(path: &Path) -> Result<Vec<TorrentRecord>, CatalogError> {
    if !path.is_file() {
        return Err(CatalogError::SourceMissing(path.display().to_string()));
    }

    let file = File::open(path).map_err(|e| CatalogError::Source(e.to_string()))?;
    let records = parse_records(file)?;
    debug!(path = %path.display(), records = records.len(), "Parsed catalog source");

    Ok(records)
}
