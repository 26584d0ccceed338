//! Presentation helpers for result rows.

use serde::{Deserialize, Serialize};

use crate::catalog::TorrentRecord;

const SIZE_UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

/// Layout used when showing a record timestamp.
const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human-readable size: the largest unit keeping the value at or above 1,
/// two decimals at most. Unknown sizes render as an empty string.
pub fn pretty_size(size: Option<u64>) -> String {
    let Some(bytes) = size else {
        return String::new();
    };

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Magnet URI for a torrent hash, with the title as display name.
pub fn magnet_link(hash: &str, title: &str) -> String {
    format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        hash,
        urlencoding::encode(title)
    )
}

/// Sort rows newest first. Rows with equal timestamps keep their relative order.
pub fn sort_newest_first(rows: &mut [&TorrentRecord]) {
    rows.sort_by(|a, b| b.dt.cmp(&a.dt));
}

/// A record rendered for a results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub title: String,
    pub date: String,
    pub category: String,
    /// Pretty-printed size; empty when unknown.
    pub size: String,
    /// Empty when unknown.
    pub imdb: String,
    pub magnet: String,
}

impl From<&TorrentRecord> for DisplayRow {
    fn from(record: &TorrentRecord) -> Self {
        Self {
            title: record.title.clone(),
            date: record.dt.format(DISPLAY_DATE_FORMAT).to_string(),
            category: record.cat.clone(),
            size: pretty_size(record.size),
            imdb: record.imdb.clone().unwrap_or_default(),
            magnet: magnet_link(&record.hash, &record.title),
        }
    }
}
