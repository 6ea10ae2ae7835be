//! Set API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use cardcatalog_core::{MtgSet, NewMtgSet};

use super::cards::CardResponse;
use super::error::{ApiError, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SetListResponse {
    pub sets: Vec<MtgSet>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SetCardsResponse {
    pub set: MtgSet,
    pub cards: Vec<CardResponse>,
    pub total: usize,
}

fn find_set(state: &AppState, code: &str) -> Result<MtgSet, ApiError> {
    state
        .cards()
        .get_set_by_code(code)?
        .ok_or_else(|| ApiError::not_found(format!("Set not found: {}", code)))
}

/// POST /api/v1/sets
pub async fn create_set(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewMtgSet>,
) -> Result<(StatusCode, Json<MtgSet>), ApiError> {
    let set = state.cards().create_set(body)?;
    info!(code = %set.code, "Created set");
    Ok((StatusCode::CREATED, Json(set)))
}

/// GET /api/v1/sets
pub async fn list_sets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SetListResponse>, ApiError> {
    let sets = state.cards().list_sets()?;
    let total = sets.len();
    Ok(Json(SetListResponse { sets, total }))
}

/// GET /api/v1/sets/{code}
pub async fn get_set(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<MtgSet>, ApiError> {
    Ok(Json(find_set(&state, &code)?))
}

/// DELETE /api/v1/sets/{code}
///
/// Removes the set and every card in it.
pub async fn delete_set(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let set = find_set(&state, &code)?;
    state.cards().delete_set(&set.id)?;
    info!(%code, "Deleted set");
    Ok(Json(SuccessResponse {
        message: format!("Deleted set {}", code),
    }))
}

/// GET /api/v1/sets/{code}/cards
pub async fn list_set_cards(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<SetCardsResponse>, ApiError> {
    let set = find_set(&state, &code)?;
    let cards: Vec<CardResponse> = state
        .cards()
        .cards_in_set(&set.id)?
        .into_iter()
        .map(CardResponse::from)
        .collect();

    let total = cards.len();
    Ok(Json(SetCardsResponse { set, cards, total }))
}
