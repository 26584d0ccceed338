//! Query types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::parse_timestamp;

/// A typed catalog query. Every predicate is optional; an empty query matches
/// the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentQuery {
    /// Case-insensitive title substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Keep records strictly older than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<NaiveDateTime>,
    /// Keep records strictly newer than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<NaiveDateTime>,
    /// Allowed categories; empty means any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Exact IMDb id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
}

impl TorrentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn before(mut self, before: NaiveDateTime) -> Self {
        self.before = Some(before);
        self
    }

    pub fn after(mut self, after: NaiveDateTime) -> Self {
        self.after = Some(after);
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn imdb(mut self, imdb: impl Into<String>) -> Self {
        self.imdb = Some(imdb.into());
        self
    }
}

/// Query fields as typed by a user, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

/// Errors turning user input into a query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid {field} date: {value}")]
    InvalidDate { field: &'static str, value: String },
}

fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDateTime>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| QueryError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

impl TryFrom<&SearchParams> for TorrentQuery {
    type Error = QueryError;

    fn try_from(params: &SearchParams) -> Result<Self, Self::Error> {
        Ok(TorrentQuery {
            title: params.title.clone(),
            before: parse_bound("before", params.before.as_deref())?,
            after: parse_bound("after", params.after.as_deref())?,
            categories: params.categories.clone(),
            imdb: params.imdb.clone(),
        })
    }
}
