//! Cache artifact and the policy deciding when it may be trusted.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CatalogError, TorrentRecord};
use crate::config::CachePolicyKind;

/// Decides whether an existing cache file may stand in for the source.
pub trait CachePolicy: Send + Sync {
    /// Policy name for logging.
    fn name(&self) -> &str;

    /// Whether the cache at `cache_path` may be used instead of parsing `source_path`.
    fn is_usable(&self, cache_path: &Path, source_path: &Path) -> bool;
}

/// Uses any cache file that exists, without looking at the source.
///
/// A stale cache is only refreshed by an explicit cache clear.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustExisting;

impl CachePolicy for TrustExisting {
    fn name(&self) -> &str {
        "trust_existing"
    }

    fn is_usable(&self, cache_path: &Path, _source_path: &Path) -> bool {
        cache_path.is_file()
    }
}

/// Uses the cache only when it was written no earlier than the source was modified.
///
/// If the source is gone the cache is all there is, so it is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewerThanSource;

impl CachePolicy for NewerThanSource {
    fn name(&self) -> &str {
        "newer_than_source"
    }

    fn is_usable(&self, cache_path: &Path, source_path: &Path) -> bool {
        let cache_modified = match fs::metadata(cache_path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return false,
        };

        match fs::metadata(source_path).and_then(|m| m.modified()) {
            Ok(source_modified) => cache_modified >= source_modified,
            Err(_) => true,
        }
    }
}

/// Build the policy selected in configuration.
pub fn policy_for(kind: CachePolicyKind) -> Box<dyn CachePolicy> {
    match kind {
        CachePolicyKind::TrustExisting => Box::new(TrustExisting),
        CachePolicyKind::NewerThanSource => Box::new(NewerThanSource),
    }
}

/// The serialized record snapshot on disk.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Decode the snapshot. The content is trusted as-is.
    pub fn read(&self) -> Result<Vec<TorrentRecord>, CatalogError> {
        let bytes = fs::read(&self.path).map_err(|e| CatalogError::CacheRead(e.to_string()))?;
        let records: Vec<TorrentRecord> =
            bincode::deserialize(&bytes).map_err(|e| CatalogError::CacheRead(e.to_string()))?;
        Ok(records)
    }

    /// Write the snapshot, creating the cache directory if needed.
    ///
    /// The file is written to a sibling temp path and renamed into place so a
    /// crash mid-write never leaves a truncated cache behind.
    pub fn write(&self, records: &[TorrentRecord]) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|e| CatalogError::CacheWrite(e.to_string()))?;
            }
        }

        let encoded =
            bincode::serialize(records).map_err(|e| CatalogError::CacheWrite(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&encoded)?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CatalogError::CacheWrite(e.to_string())
        })?;

        debug!(path = %self.path.display(), bytes = encoded.len(), "Wrote catalog cache");
        Ok(())
    }

    /// Delete the snapshot. Returns whether a file was removed; a missing file is not an error.
    pub fn remove(&self) -> Result<bool, CatalogError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CatalogError::CacheRemove(e.to_string())),
        }
    }
}
