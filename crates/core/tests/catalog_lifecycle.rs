//! Catalog lifecycle integration tests.
//!
//! These tests drive the store through the public API against files on disk:
//! - Cold load from source, warm load from cache
//! - Cache clearing and re-parse on the next cold load
//! - Queries over the loaded catalog

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use rarbg_finder_core::{
    catalog::{CacheFile, TrustExisting},
    find, magnet_link, parse_timestamp, pretty_size, CachePolicyKind, CatalogError,
    CatalogStore, DataConfig, SearchParams, TorrentQuery,
};

const SOURCE: &str = "\
id,hash,title,dt,cat,size,ext_id,imdb
1,1111,Inception.2010.1080p.BluRay,2017-03-01 08:00:00,movies_x264,2147483648,,tt1375666
2,2222,Breaking.Bad.S01E01.720p,2017-04-11 21:15:00,tv,,,tt0903747
3,3333,Inception.2010.2160p.UHD,2018-09-30 23:59:59,movies_x265,16106127360,,tt1375666
4,4444,Some.Game-CODEX,2018-12-24 12:00:00,games_pc_iso,,,
5,1111,Inception.2010.1080p.BluRay,2017-03-01 08:00:00,movies_x264,2147483648,,tt1375666
";

/// Test helper owning a scratch directory with a source dump.
struct TestHarness {
    dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("dump.csv"), SOURCE).expect("Failed to write source");
        Self { dir }
    }

    fn config(&self) -> DataConfig {
        DataConfig {
            source_path: self.dir.path().join("dump.csv"),
            cache_path: self.cache_path(),
            cache_policy: CachePolicyKind::TrustExisting,
        }
    }

    fn cache_path(&self) -> PathBuf {
        self.dir.path().join("cache").join("cache.bin")
    }

    fn store(&self) -> CatalogStore {
        CatalogStore::new(&self.config())
    }
}

#[test]
fn cache_round_trip_preserves_records_and_categories() {
    let harness = TestHarness::new();

    let cold = harness.store().load().unwrap();
    assert!(harness.cache_path().exists());

    let warm = harness.store().load().unwrap();
    assert_eq!(warm.records(), cold.records());
    assert_eq!(warm.categories(), cold.categories());
    assert_eq!(
        warm.categories(),
        &["movies_x264", "tv", "movies_x265", "games_pc_iso"]
    );
}

#[test]
fn cache_file_matches_loaded_records() {
    let harness = TestHarness::new();
    let catalog = harness.store().load().unwrap();

    let cached = CacheFile::new(harness.cache_path()).read().unwrap();
    assert_eq!(cached, catalog.records());
}

#[test]
fn empty_query_returns_every_record_once_in_load_order() {
    let harness = TestHarness::new();
    let store = harness.store();
    let catalog = store.catalog().unwrap();

    let rows = store.find(&TorrentQuery::new()).unwrap();
    assert_eq!(rows.len(), 5);
    for (row, record) in rows.iter().zip(catalog.records()) {
        assert!(std::ptr::eq(*row, record));
    }
}

#[test]
fn duplicates_surface_in_results() {
    let harness = TestHarness::new();
    let store = harness.store();

    let rows = store
        .find(&TorrentQuery::new().title("1080p").imdb("tt1375666"))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], rows[1]);
}

#[test]
fn date_bounds_are_exclusive() {
    let harness = TestHarness::new();
    let catalog = harness.store().load().unwrap();
    let boundary = parse_timestamp("2018-09-30 23:59:59").unwrap();

    let before = find(catalog.records(), &TorrentQuery::new().before(boundary));
    assert!(before.iter().all(|r| r.dt < boundary));
    assert_eq!(before.len(), 3);

    let after = find(catalog.records(), &TorrentQuery::new().after(boundary));
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].title, "Some.Game-CODEX");
}

#[test]
fn category_asymmetry() {
    let harness = TestHarness::new();
    let catalog = harness.store().load().unwrap();
    let empty: [&str; 0] = [];

    let unrestricted = find(catalog.records(), &TorrentQuery::new().categories(empty));
    assert_eq!(unrestricted.len(), catalog.len());

    let unknown = find(catalog.records(), &TorrentQuery::new().categories(["xxx"]));
    assert!(unknown.is_empty());
}

#[test]
fn clear_cache_twice_does_not_fail() {
    let harness = TestHarness::new();
    let store = harness.store();
    store.catalog().unwrap();

    assert!(store.clear_cache().unwrap());
    assert!(!store.clear_cache().unwrap());
    assert!(!harness.cache_path().exists());
}

#[test]
fn clear_cache_only_affects_next_cold_load() {
    let harness = TestHarness::new();
    let store = Arc::new(harness.store());
    let loaded = store.catalog().unwrap();

    // Replace the source and clear the cache
    fs::write(
        harness.config().source_path,
        "title,dt,cat,size,imdb,hash\nNew.Release,2021-01-01 00:00:00,tv,1,,9999\n",
    )
    .unwrap();
    store.clear_cache().unwrap();

    // The loaded catalog is unchanged
    assert_eq!(store.catalog().unwrap().len(), loaded.len());
    assert_eq!(store.categories().unwrap(), loaded.categories());

    // A fresh store sees the new source and rewrites the cache
    let fresh = harness.store();
    let catalog = fresh.catalog().unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.categories(), &["tv"]);
    assert!(harness.cache_path().exists());
}

#[test]
fn missing_source_without_cache_is_fatal() {
    let harness = TestHarness::new();
    fs::remove_file(harness.config().source_path).unwrap();

    let store = CatalogStore::with_policy(
        harness.dir.path().join("dump.csv"),
        harness.cache_path(),
        Box::new(TrustExisting),
    );
    assert!(matches!(store.catalog(), Err(CatalogError::SourceMissing(_))));
    assert!(!store.is_loaded());
}

#[test]
fn malformed_row_fails_whole_load() {
    let harness = TestHarness::new();
    fs::write(
        harness.config().source_path,
        format!("{}6,5555,Broken,not-a-date,tv,1,,\n", SOURCE),
    )
    .unwrap();

    let err = harness.store().load().unwrap_err();
    assert!(matches!(err, CatalogError::MalformedRecord { line: 7, .. }));
    assert!(!harness.cache_path().exists());
}

#[test]
fn user_search_with_bad_input_is_empty() {
    let harness = TestHarness::new();
    let store = harness.store();

    let params = SearchParams {
        title: Some("inception".to_string()),
        before: Some("31/12/2018".to_string()),
        ..Default::default()
    };
    assert!(store.search(&params).unwrap().is_empty());

    let params = SearchParams {
        title: Some("inception".to_string()),
        before: Some("2018-01-01".to_string()),
        ..Default::default()
    };
    assert_eq!(store.search(&params).unwrap().len(), 2);
}

#[test]
fn rows_render_for_display() {
    let harness = TestHarness::new();
    let store = harness.store();
    let rows = store.find(&TorrentQuery::new().title("2160p")).unwrap();
    let record = rows[0];

    assert_eq!(pretty_size(record.size), "15 GB");
    assert_eq!(
        magnet_link(&record.hash, &record.title),
        "magnet:?xt=urn:btih:3333&dn=Inception.2010.2160p.UHD"
    );
}
