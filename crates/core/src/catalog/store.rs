//! The catalog store handle: load-once access to the catalog and its cache.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use super::cache::{policy_for, CacheFile, CachePolicy};
use super::source::read_source;
use super::{Catalog, CatalogError, TorrentRecord};
use crate::config::DataConfig;
use crate::metrics;
use crate::query::{find, SearchParams, TorrentQuery};

/// Where a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Cache,
    Source,
}

impl LoadOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            LoadOrigin::Cache => "cache",
            LoadOrigin::Source => "source",
        }
    }
}

/// Owns the source and cache locations and the loaded catalog.
///
/// Constructed once by the application and shared by reference. The catalog
/// is loaded on the first call to [`CatalogStore::catalog`] and kept for the
/// lifetime of the store; clearing the cache afterwards only affects the next
/// store that loads.
pub struct CatalogStore {
    source_path: PathBuf,
    cache: CacheFile,
    policy: Box<dyn CachePolicy>,
    loaded: OnceCell<Arc<Catalog>>,
}

impl fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogStore")
            .field("source_path", &self.source_path)
            .field("cache_path", &self.cache.path())
            .field("policy", &self.policy.name())
            .field("loaded", &self.loaded.get().is_some())
            .finish()
    }
}

impl CatalogStore {
    /// Create a store from the `[data]` configuration section.
    pub fn new(config: &DataConfig) -> Self {
        Self::with_policy(
            &config.source_path,
            &config.cache_path,
            policy_for(config.cache_policy),
        )
    }

    /// Create a store with an explicit cache policy.
    pub fn with_policy(
        source_path: impl Into<PathBuf>,
        cache_path: impl Into<PathBuf>,
        policy: Box<dyn CachePolicy>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            cache: CacheFile::new(cache_path),
            policy,
            loaded: OnceCell::new(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn cache_path(&self) -> &Path {
        self.cache.path()
    }

    /// Whether the catalog has been loaded by this store.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Load the catalog from cache or source without memoizing it.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let (records, origin) = self.load_records()?;
        let catalog = Catalog::new(records);

        metrics::CATALOG_LOADS
            .with_label_values(&[origin.as_str()])
            .inc();
        metrics::CATALOG_RECORDS.set(catalog.len() as i64);
        info!(
            origin = origin.as_str(),
            records = catalog.len(),
            categories = catalog.categories().len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    fn load_records(&self) -> Result<(Vec<TorrentRecord>, LoadOrigin), CatalogError> {
        if self.policy.is_usable(self.cache.path(), &self.source_path) {
            match self.cache.read() {
                Ok(records) => return Ok((records, LoadOrigin::Cache)),
                Err(e) => warn!(
                    path = %self.cache.path().display(),
                    error = %e,
                    "Unreadable catalog cache, falling back to source"
                ),
            }
        } else if self.cache.exists() {
            debug!(
                policy = self.policy.name(),
                "Catalog cache rejected by policy, parsing source"
            );
        }

        let records = read_source(&self.source_path)?;

        // The parsed catalog is usable even when it cannot be cached
        if let Err(e) = self.cache.write(&records) {
            metrics::CACHE_WRITE_FAILURES.inc();
            warn!(
                path = %self.cache.path().display(),
                error = %e,
                "Failed to write catalog cache, continuing without it"
            );
        }

        Ok((records, LoadOrigin::Source))
    }

    /// The catalog, loaded on first access and shared afterwards.
    pub fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.loaded_catalog().map(Arc::clone)
    }

    fn loaded_catalog(&self) -> Result<&Arc<Catalog>, CatalogError> {
        self.loaded.get_or_try_init(|| self.load().map(Arc::new))
    }

    /// Distinct categories of the loaded catalog in first-occurrence order.
    pub fn categories(&self) -> Result<&[String], CatalogError> {
        Ok(self.loaded_catalog()?.categories())
    }

    /// Run a typed query against the loaded catalog.
    pub fn find(&self, query: &TorrentQuery) -> Result<Vec<&TorrentRecord>, CatalogError> {
        let catalog = self.loaded_catalog()?;
        let rows = find(catalog.records(), query);

        metrics::SEARCHES_TOTAL.with_label_values(&["ok"]).inc();
        metrics::SEARCH_RESULTS.observe(rows.len() as f64);

        Ok(rows)
    }

    /// Run a query typed by a user.
    ///
    /// Input that does not parse (e.g. an unreadable date) yields no rows
    /// rather than an error; only a failure to load the catalog is returned.
    pub fn search(&self, params: &SearchParams) -> Result<Vec<&TorrentRecord>, CatalogError> {
        match TorrentQuery::try_from(params) {
            Ok(query) => self.find(&query),
            Err(e) => {
                // Still load, so a missing catalog is reported regardless of input
                self.loaded_catalog()?;
                metrics::SEARCHES_TOTAL
                    .with_label_values(&["invalid_input"])
                    .inc();
                debug!(error = %e, "Ignoring search with invalid input");
                Ok(Vec::new())
            }
        }
    }

    /// Delete the cache artifact. Returns whether a file was removed.
    ///
    /// The loaded catalog is untouched; the next cold load re-parses the source.
    pub fn clear_cache(&self) -> Result<bool, CatalogError> {
        let removed = self.cache.remove()?;
        if removed {
            info!(path = %self.cache.path().display(), "Catalog cache cleared");
        } else {
            debug!(path = %self.cache.path().display(), "No catalog cache to clear");
        }
        Ok(removed)
    }
}
