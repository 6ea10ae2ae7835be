use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{cards, catalogs, entries, handlers, sets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalogs
        .route(
            "/catalogs",
            post(catalogs::create_catalog).get(catalogs::list_catalogs),
        )
        .route(
            "/catalogs/{id}",
            get(catalogs::get_catalog).delete(catalogs::delete_catalog),
        )
        // Catalog metadata (MTGJSON version and import stats)
        .route("/catalogs/{id}/meta", get(catalogs::get_meta))
        .route("/catalogs/{id}/meta/version", put(catalogs::update_version))
        .route(
            "/catalogs/{id}/meta/needs-update",
            get(catalogs::needs_update),
        )
        // Adapter operations
        .route("/catalogs/{id}/search", get(entries::search))
        .route(
            "/catalogs/{id}/entries/{identifier}",
            get(entries::get_entry),
        )
        .route(
            "/catalogs/{id}/entries/{identifier}/refresh",
            post(entries::refresh_entry),
        )
        .route("/catalogs/{id}/import", post(entries::import))
        // Sets
        .route("/sets", post(sets::create_set).get(sets::list_sets))
        .route("/sets/{code}", get(sets::get_set).delete(sets::delete_set))
        .route("/sets/{code}/cards", get(sets::list_set_cards))
        // Cards
        .route("/cards", post(cards::create_card))
        .route(
            "/cards/{uuid}",
            get(cards::get_card).delete(cards::delete_card),
        )
        .route("/cards/{uuid}/image", get(cards::get_card_image));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
