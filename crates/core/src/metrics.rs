//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog loading (origin, cache write failures, loaded size)
//! - Queries (count by outcome, result sizes)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Catalog
// =============================================================================

/// Catalog loads by origin.
pub static CATALOG_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("rarbg_finder_catalog_loads_total", "Total catalog loads"),
        &["origin"], // "cache", "source"
    )
    .unwrap()
});

/// Cache writes that failed after a source parse.
pub static CACHE_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "rarbg_finder_cache_write_failures_total",
        "Total failed catalog cache writes",
    )
    .unwrap()
});

/// Records in the most recently loaded catalog.
pub static CATALOG_RECORDS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "rarbg_finder_catalog_records",
        "Number of records in the loaded catalog",
    )
    .unwrap()
});

// =============================================================================
// Queries
// =============================================================================

/// Searches by outcome.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("rarbg_finder_searches_total", "Total catalog searches"),
        &["outcome"], // "ok", "invalid_input"
    )
    .unwrap()
});

/// Rows returned per search.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "rarbg_finder_search_results",
            "Number of rows returned per search",
        )
        .buckets(vec![0.0, 1.0, 10.0, 100.0, 1000.0, 10000.0, 100000.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_LOADS.clone()),
        Box::new(CACHE_WRITE_FAILURES.clone()),
        Box::new(CATALOG_RECORDS.clone()),
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
