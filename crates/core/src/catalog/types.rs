//! Types for the torrent catalog.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One row of the catalog.
///
/// The field layout is also the cache artifact layout, so fields must not be
/// skipped conditionally during serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Torrent title.
    pub title: String,
    /// Upload timestamp as recorded in the dump (no time zone).
    pub dt: NaiveDateTime,
    /// Category label (e.g. "movies_x264", "tv").
    pub cat: String,
    /// Total size in bytes, when known.
    pub size: Option<u64>,
    /// IMDb identifier (e.g. "tt0111161"), when known.
    pub imdb: Option<String>,
    /// Info hash used to build the magnet link.
    pub hash: String,
}

/// The loaded record set plus its derived category list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<TorrentRecord>,
    categories: Vec<String>,
}

impl Catalog {
    /// Build a catalog, deriving the distinct categories in first-occurrence order.
    pub fn new(records: Vec<TorrentRecord>) -> Self {
        let categories = {
            let mut seen = HashSet::new();
            records
                .iter()
                .filter(|r| seen.insert(r.cat.as_str()))
                .map(|r| r.cat.clone())
                .collect()
        };

        Self {
            records,
            categories,
        }
    }

    /// Records in load order.
    pub fn records(&self) -> &[TorrentRecord] {
        &self.records
    }

    /// Distinct category labels in first-occurrence order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary figures for the loaded catalog.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_records: self.records.len() as u64,
            total_categories: self.categories.len() as u32,
            oldest_entry: self.records.iter().map(|r| r.dt).min(),
            newest_entry: self.records.iter().map(|r| r.dt).max(),
        }
    }
}

/// Catalog statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of loaded records (duplicates included).
    pub total_records: u64,
    /// Number of distinct categories.
    pub total_categories: u32,
    /// Oldest record timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<NaiveDateTime>,
    /// Newest record timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<NaiveDateTime>,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog source not found and no usable cache: {0}")]
    SourceMissing(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Failed to read catalog source: {0}")]
    Source(String),

    #[error("Failed to read cache: {0}")]
    CacheRead(String),

    #[error("Failed to write cache: {0}")]
    CacheWrite(String),

    #[error("Failed to remove cache: {0}")]
    CacheRemove(String),
}
