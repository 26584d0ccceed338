//! Record filters and their composition.
//!
//! Each filter accepts any iterator of record references and returns the
//! matching references in input order, so filters chain in any order and the
//! catalog itself is never modified.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::TorrentQuery;
use crate::catalog::TorrentRecord;

/// Keep records whose title contains `needle`, ignoring case. An empty needle keeps everything.
pub fn filter_title<'a, I>(rows: I, needle: &str) -> Vec<&'a TorrentRecord>
where
    I: IntoIterator<Item = &'a TorrentRecord>,
{
    if needle.is_empty() {
        return rows.into_iter().collect();
    }

    let needle = needle.to_lowercase();
    rows.into_iter()
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .collect()
}

/// Keep records with exactly this IMDb id. Records without an id never match.
pub fn filter_imdb<'a, I>(rows: I, id: &str) -> Vec<&'a TorrentRecord>
where
    I: IntoIterator<Item = &'a TorrentRecord>,
{
    rows.into_iter()
        .filter(|r| r.imdb.as_deref() == Some(id))
        .collect()
}

/// Keep records with `dt < before` and `dt > after`, each bound applied only when given.
pub fn filter_date_range<'a, I>(
    rows: I,
    before: Option<NaiveDateTime>,
    after: Option<NaiveDateTime>,
) -> Vec<&'a TorrentRecord>
where
    I: IntoIterator<Item = &'a TorrentRecord>,
{
    rows.into_iter()
        .filter(|r| before.is_none_or(|b| r.dt < b))
        .filter(|r| after.is_none_or(|a| r.dt > a))
        .collect()
}

/// Keep records in one of `categories`.
///
/// An empty set means "no restriction", not "nothing matches": a category
/// picker with nothing ticked shows everything.
pub fn filter_categories<'a, I, S>(rows: I, categories: &[S]) -> Vec<&'a TorrentRecord>
where
    I: IntoIterator<Item = &'a TorrentRecord>,
    S: AsRef<str>,
{
    if categories.is_empty() {
        return rows.into_iter().collect();
    }

    let allowed: HashSet<&str> = categories.iter().map(|c| c.as_ref()).collect();
    rows.into_iter()
        .filter(|r| allowed.contains(r.cat.as_str()))
        .collect()
}

/// Run every predicate of `query` over `records`.
///
/// Filters run as title, date range, categories, IMDb; the result is the
/// intersection of all given predicates in load order. Predicates left out
/// of the query are skipped.
pub fn find<'a>(records: &'a [TorrentRecord], query: &TorrentQuery) -> Vec<&'a TorrentRecord> {
    let mut rows: Vec<&TorrentRecord> = match &query.title {
        Some(title) => filter_title(records, title),
        None => records.iter().collect(),
    };

    if query.before.is_some() || query.after.is_some() {
        rows = filter_date_range(rows, query.before, query.after);
    }

    if let Some(categories) = &query.categories {
        rows = filter_categories(rows, categories);
    }

    if let Some(imdb) = &query.imdb {
        rows = filter_imdb(rows, imdb);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn record(title: &str, dt: NaiveDateTime, cat: &str, imdb: Option<&str>) -> TorrentRecord {
        TorrentRecord {
            title: title.to_string(),
            dt,
            cat: cat.to_string(),
            size: Some(1024),
            imdb: imdb.map(str::to_string),
            hash: format!("{:x}", title.len()),
        }
    }

    fn sample() -> Vec<TorrentRecord> {
        vec![
            record("The.Matrix.1999.1080p", at(2018, 1, 1), "movies", Some("tt0133093")),
            record("Matrix Reloaded 2003", at(2018, 6, 1), "movies_x265", Some("tt0234215")),
            record("Westworld S01E01", at(2019, 1, 1), "tv", Some("tt0475784")),
            record("Random Album FLAC", at(2019, 6, 1), "music_flac", None),
            record("The.Matrix.1999.1080p", at(2020, 1, 1), "movies", Some("tt0133093")),
        ]
    }

    fn titles(rows: &[&TorrentRecord]) -> Vec<String> {
        rows.iter()
            .map(|r| format!("{}@{}", r.title, r.dt.format("%Y-%m")))
            .collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let records = sample();
        let rows = find(&records, &TorrentQuery::new());

        assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*row, record));
        }
    }

    #[test]
    fn test_filter_title_case_insensitive() {
        let records = sample();
        let rows = filter_title(&records, "mATRix");
        assert_eq!(
            titles(&rows),
            vec![
                "The.Matrix.1999.1080p@2018-01",
                "Matrix Reloaded 2003@2018-06",
                "The.Matrix.1999.1080p@2020-01",
            ]
        );
    }

    #[test]
    fn test_filter_title_empty_and_no_match() {
        let records = sample();
        assert_eq!(filter_title(&records, "").len(), 5);
        assert!(filter_title(&records, "nonexistent").is_empty());
    }

    #[test]
    fn test_filter_title_is_not_a_pattern() {
        let records = vec![record("Movie (2019) [1080p]", at(2019, 1, 1), "movies", None)];
        assert_eq!(filter_title(&records, "(2019) [").len(), 1);
        assert!(filter_title(&records, "M.vie").is_empty());
    }

    #[test]
    fn test_filter_imdb_exact() {
        let records = sample();
        assert_eq!(filter_imdb(&records, "tt0133093").len(), 2);
        assert!(filter_imdb(&records, "tt013309").is_empty());
        // Records without an id do not match an empty id
        assert!(filter_imdb(&records, "").is_empty());
    }

    #[test]
    fn test_filter_date_range_exclusive_bounds() {
        let records = sample();

        let rows = filter_date_range(&records, Some(at(2019, 1, 1)), None);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.dt < at(2019, 1, 1)));

        let rows = filter_date_range(&records, None, Some(at(2019, 1, 1)));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.dt > at(2019, 1, 1)));

        let rows = filter_date_range(&records, Some(at(2019, 6, 1)), Some(at(2018, 1, 1)));
        assert_eq!(
            titles(&rows),
            vec!["Matrix Reloaded 2003@2018-06", "Westworld S01E01@2019-01"]
        );
    }

    #[test]
    fn test_filter_date_range_no_bounds_is_noop() {
        let records = sample();
        assert_eq!(filter_date_range(&records, None, None).len(), records.len());
    }

    #[test]
    fn test_filter_categories_empty_means_unrestricted() {
        let records = sample();
        let none: [&str; 0] = [];
        assert_eq!(filter_categories(&records, &none).len(), records.len());
    }

    #[test]
    fn test_filter_categories_unknown_matches_nothing() {
        let records = sample();
        assert!(filter_categories(&records, &["xxx"]).is_empty());
    }

    #[test]
    fn test_filter_categories_membership() {
        let records = sample();
        let rows = filter_categories(&records, &["tv".to_string(), "music_flac".to_string()]);
        assert_eq!(
            titles(&rows),
            vec!["Westworld S01E01@2019-01", "Random Album FLAC@2019-06"]
        );
    }

    #[test]
    fn test_filters_do_not_mutate_input() {
        let records = sample();
        let before = records.clone();
        let narrowed = filter_title(&records, "matrix");
        let _ = filter_categories(narrowed.clone(), &["tv"]);
        assert_eq!(narrowed.len(), 3);
        assert_eq!(records, before);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let records = sample();

        let a = filter_categories(filter_title(&records, "matrix"), &["movies"]);
        let b = filter_title(filter_categories(&records, &["movies"]), "matrix");
        assert_eq!(a, b);

        let c = filter_imdb(filter_date_range(&records, None, Some(at(2018, 3, 1))), "tt0133093");
        let d = filter_date_range(filter_imdb(&records, "tt0133093"), None, Some(at(2018, 3, 1)));
        assert_eq!(c, d);
        assert_eq!(titles(&c), vec!["The.Matrix.1999.1080p@2020-01"]);
    }

    #[test]
    fn test_find_composes_all_predicates() {
        let records = sample();
        let query = TorrentQuery::new()
            .title("matrix")
            .before(at(2021, 1, 1))
            .after(at(2018, 1, 1))
            .categories(["movies", "movies_x265"])
            .imdb("tt0133093");

        let rows = find(&records, &query);
        assert_eq!(titles(&rows), vec!["The.Matrix.1999.1080p@2020-01"]);

        let manual = filter_imdb(
            filter_categories(
                filter_date_range(
                    filter_title(&records, "matrix"),
                    Some(at(2021, 1, 1)),
                    Some(at(2018, 1, 1)),
                ),
                &["movies", "movies_x265"],
            ),
            "tt0133093",
        );
        assert_eq!(rows, manual);
    }

    #[test]
    fn test_find_empty_categories_is_unrestricted() {
        let records = sample();
        let empty: [&str; 0] = [];
        let query = TorrentQuery::new().title("matrix").categories(empty);
        assert_eq!(find(&records, &query).len(), 3);
    }

    #[test]
    fn test_find_keeps_duplicates() {
        let records = sample();
        let query = TorrentQuery::new().imdb("tt0133093");
        assert_eq!(find(&records, &query).len(), 2);
    }
}
