//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rarbg_finder_core::{
    sort_newest_first, CatalogError, CatalogStats, DisplayRow, SearchParams,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    /// Comma-separated category labels; empty means any category.
    #[serde(default)]
    pub categories: Option<String>,
    /// Maximum rows returned after sorting.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<&SearchQueryParams> for SearchParams {
    fn from(params: &SearchQueryParams) -> Self {
        SearchParams {
            title: params.title.clone(),
            imdb: params.imdb.clone(),
            before: params.before.clone(),
            after: params.after.clone(),
            categories: params.categories.as_deref().map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub rows: Vec<DisplayRow>,
    /// Matches before `limit` was applied.
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub removed: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(e: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    error!("Catalog error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/categories
///
/// Distinct categories in the order they first appear in the catalog.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesResponse>, impl IntoResponse> {
    match state.store().categories() {
        Ok(categories) => Ok(Json(CategoriesResponse {
            categories: categories.to_vec(),
        })),
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /api/v1/search
///
/// Search the catalog. Rows are returned newest first.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<SearchResponse>, impl IntoResponse> {
    let search_params = SearchParams::from(&params);

    let mut rows = match state.store().search(&search_params) {
        Ok(rows) => rows,
        Err(e) => return Err(internal_error(e)),
    };
    let total = rows.len();

    sort_newest_first(&mut rows);
    if let Some(limit) = params.limit {
        rows.truncate(limit);
    }
    debug!(total, returned = rows.len(), "Search completed");

    Ok(Json(SearchResponse {
        rows: rows.into_iter().map(DisplayRow::from).collect(),
        total,
    }))
}

/// GET /api/v1/catalog/stats
///
/// Get catalog statistics.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogStats>, impl IntoResponse> {
    match state.store().catalog() {
        Ok(catalog) => Ok(Json(catalog.stats())),
        Err(e) => Err(internal_error(e)),
    }
}

/// DELETE /api/v1/cache
///
/// Delete the cache artifact. The loaded catalog stays in memory until restart.
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearCacheResponse>, impl IntoResponse> {
    match state.store().clear_cache() {
        Ok(removed) => {
            let message = if removed {
                "Cache cleared; restart to reload from source".to_string()
            } else {
                "No cache to clear".to_string()
            };
            Ok(Json(ClearCacheResponse { removed, message }))
        }
        Err(e) => Err(internal_error(e)),
    }
}
