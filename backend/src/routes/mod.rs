//! Route definitions for the farm risk dashboard

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Stateless scoring
        .route("/risk/score", post(handlers::score_risk))
        // Farm records
        .nest("/farms", farm_routes())
}

/// Farm routes
fn farm_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::register_farm))
        .route("/:farm_id", get(handlers::get_farm))
        .route("/:farm_id/seed", post(handlers::seed_farm))
        .route("/:farm_id/summary", get(handlers::get_summary))
        .route("/:farm_id/grid", put(handlers::replace_grid))
        .route("/:farm_id/variance", post(handlers::record_variance))
        .route("/:farm_id/zones/:zone_id", get(handlers::get_zone))
}
