//! Adapter-backed catalog handlers: search, entry lookup, refresh, import.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use cardcatalog_core::{CardAdapter, ImportOptions, ImportStats, SearchOptions};

use super::cards::CardResponse;
use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CardResponse>,
    pub total: usize,
}

fn adapter_for_catalog(state: &AppState, id: &str) -> Result<Box<CardAdapter>, ApiError> {
    let catalog = state.catalogs().get(id)?;
    Ok(state.adapter(catalog)?)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/catalogs/{id}/search?q=&limit=&offset=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let adapter = adapter_for_catalog(&state, &id)?;

    let options = SearchOptions {
        limit: params.limit,
        offset: params.offset,
    };
    let results: Vec<CardResponse> = adapter
        .search(&params.q, &options)
        .await?
        .into_iter()
        .map(CardResponse::from)
        .collect();

    let total = results.len();
    Ok(Json(SearchResponse {
        query: params.q,
        results,
        total,
    }))
}

/// GET /api/v1/catalogs/{id}/entries/{identifier}
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path((id, identifier)): Path<(String, String)>,
) -> Result<Json<CardResponse>, ApiError> {
    let adapter = adapter_for_catalog(&state, &id)?;

    match adapter.fetch_entry(&identifier).await? {
        Some(card) => Ok(Json(card.into())),
        None => Err(ApiError::not_found(format!(
            "Entry not found: {}",
            identifier
        ))),
    }
}

/// POST /api/v1/catalogs/{id}/entries/{identifier}/refresh
pub async fn refresh_entry(
    State(state): State<Arc<AppState>>,
    Path((id, identifier)): Path<(String, String)>,
) -> Result<Json<CardResponse>, ApiError> {
    let adapter = adapter_for_catalog(&state, &id)?;

    let entry = adapter
        .fetch_entry(&identifier)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Entry not found: {}", identifier)))?;

    let refreshed = adapter.refresh(entry).await?;
    Ok(Json(refreshed.into()))
}

/// POST /api/v1/catalogs/{id}/import
///
/// Runs the adapter's bulk import. The body is optional. Statistics of a
/// successful run are recorded on the catalog.
pub async fn import(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    options: Option<Json<ImportOptions>>,
) -> Result<Json<ImportStats>, ApiError> {
    let options = options.map(|Json(options)| options).unwrap_or_default();
    let adapter = adapter_for_catalog(&state, &id)?;

    let stats = adapter.bulk_import(&options).await?;
    if stats.success {
        state.tracker(&id).record_import_stats(stats.to_map())?;
    }

    info!(
        catalog = %id,
        success = stats.success,
        sets = stats.sets_imported,
        cards = stats.cards_imported,
        "Bulk import finished"
    );
    Ok(Json(stats))
}
