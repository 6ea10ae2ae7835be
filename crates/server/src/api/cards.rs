//! Card API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use cardcatalog_core::{CardFace, ImageSize, MtgCard, NewMtgCard};

use super::error::{ApiError, SuccessResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// A card with its derived accessors.
#[derive(Debug, Serialize)]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: MtgCard,
    pub identifier: String,
    pub display_name: String,
    /// Default (normal, front) Scryfall image.
    pub image_url: Option<String>,
}

impl From<MtgCard> for CardResponse {
    fn from(card: MtgCard) -> Self {
        Self {
            identifier: card.identifier().to_string(),
            display_name: card.display_name().to_string(),
            image_url: card.image_url(ImageSize::default(), CardFace::default()),
            card,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageParams {
    #[serde(default)]
    pub size: ImageSize,
    #[serde(default)]
    pub face: CardFace,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
    pub size: ImageSize,
    pub face: CardFace,
}

fn find_card(state: &AppState, uuid: &str) -> Result<MtgCard, ApiError> {
    state
        .cards()
        .find_card_by_uuid(uuid)?
        .ok_or_else(|| ApiError::not_found(format!("Card not found: {}", uuid)))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/cards
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewMtgCard>,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let card = state.cards().create_card(body)?;
    Ok((StatusCode::CREATED, Json(card.into())))
}

/// GET /api/v1/cards/{uuid}
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<CardResponse>, ApiError> {
    Ok(Json(find_card(&state, &uuid)?.into()))
}

/// GET /api/v1/cards/{uuid}/image?size=&face=
pub async fn get_card_image(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    Query(params): Query<ImageParams>,
) -> Result<Json<ImageResponse>, ApiError> {
    let card = find_card(&state, &uuid)?;

    match card.image_url(params.size, params.face) {
        Some(url) => Ok(Json(ImageResponse {
            url,
            size: params.size,
            face: params.face,
        })),
        None => Err(ApiError::not_found(format!("Card has no image: {}", uuid))),
    }
}

/// DELETE /api/v1/cards/{uuid}
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let card = find_card(&state, &uuid)?;
    state.cards().delete_card(&card.id)?;
    Ok(Json(SuccessResponse {
        message: format!("Deleted card {}", uuid),
    }))
}
