//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use cardcatalog_core::{validation, Catalog, CatalogMeta, NewCatalog, ValidationErrors};

use super::error::{ApiError, SuccessResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub catalogs: Vec<Catalog>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVersionBody {
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct NeedsUpdateParams {
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct NeedsUpdateResponse {
    pub version: String,
    pub current_version: Option<String>,
    pub needs_update: bool,
}

fn require_version(version: &str) -> Result<(), ApiError> {
    let mut errors = ValidationErrors::new();
    validation::require_present(&mut errors, "version", version);
    errors.into_result().map_err(ApiError::validation)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/catalogs
pub async fn create_catalog(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCatalog>,
) -> Result<(StatusCode, Json<Catalog>), ApiError> {
    let catalog = state.catalogs().create(body)?;
    info!(id = %catalog.id, source_type = %catalog.source_type, "Created catalog");
    Ok((StatusCode::CREATED, Json(catalog)))
}

/// GET /api/v1/catalogs
pub async fn list_catalogs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogListResponse>, ApiError> {
    let catalogs = state.catalogs().list()?;
    let total = catalogs.len();
    Ok(Json(CatalogListResponse { catalogs, total }))
}

/// GET /api/v1/catalogs/{id}
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Catalog>, ApiError> {
    Ok(Json(state.catalogs().get(&id)?))
}

/// DELETE /api/v1/catalogs/{id}
pub async fn delete_catalog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalogs().delete(&id)?;
    info!(%id, "Deleted catalog");
    Ok(Json(SuccessResponse {
        message: format!("Deleted catalog {}", id),
    }))
}

/// GET /api/v1/catalogs/{id}/meta
///
/// Stored MTGJSON version, last update time and import statistics.
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CatalogMeta>, ApiError> {
    Ok(Json(state.tracker(&id).meta()?))
}

/// PUT /api/v1/catalogs/{id}/meta/version
pub async fn update_version(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateVersionBody>,
) -> Result<Json<CatalogMeta>, ApiError> {
    require_version(&body.version)?;

    let tracker = state.tracker(&id);
    tracker.update_version(&body.version)?;
    Ok(Json(tracker.meta()?))
}

/// GET /api/v1/catalogs/{id}/meta/needs-update?version=
pub async fn needs_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<NeedsUpdateParams>,
) -> Result<Json<NeedsUpdateResponse>, ApiError> {
    require_version(&params.version)?;

    let tracker = state.tracker(&id);
    let needs_update = tracker.needs_update(&params.version)?;
    let current_version = tracker.current_version()?;

    Ok(Json(NeedsUpdateResponse {
        version: params.version,
        current_version,
        needs_update,
    }))
}
