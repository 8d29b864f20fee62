//! Farm HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{NarrativeRequest, RegisterFarmInput};
use uuid::Uuid;

use crate::services::farm::{zone_detail, FarmSummary, ReplaceGridInput, VarianceInput};
use crate::services::FarmService;
use crate::AppState;

/// Query parameters for seeding
#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    pub grid_size: Option<u8>,
}

/// Register a new farm
pub async fn register_farm(
    State(state): State<AppState>,
    Json(input): Json<RegisterFarmInput>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    match service
        .register(input, state.config.seeding.default_grid_size)
        .await
    {
        Ok(farm) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": farm.id, "farm": farm })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a farm record
pub async fn get_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    match service.get_farm(farm_id).await {
        Ok(farm) => (StatusCode::OK, Json(farm)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Seed a farm with a synthetic grid and history
pub async fn seed_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Query(query): Query<SeedQuery>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    match service.seed_farm(farm_id, query.grid_size).await {
        Ok(farm) => (StatusCode::OK, Json(farm)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Dashboard summary; degrades to the default summary when the farm cannot be read
pub async fn get_summary(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    let summary = match service.summary(farm_id).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(farm_id = %farm_id, "Serving default summary: {}", e);
            FarmSummary::unavailable()
        }
    };

    (StatusCode::OK, Json(summary))
}

/// Replace a farm's grid with uploaded readings
pub async fn replace_grid(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<ReplaceGridInput>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    match service.replace_grid(farm_id, input).await {
        Ok(grid) => (StatusCode::OK, Json(grid)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Score a sensor window and record it in the farm's history
pub async fn record_variance(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<VarianceInput>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    match service.record_variance(farm_id, input).await {
        Ok(recorded) => (StatusCode::OK, Json(recorded)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Zone detail with a plain-English explanation for red zones
pub async fn get_zone(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    let service = FarmService::new(state.db.clone());

    let farm = match service.get_farm(farm_id).await {
        Ok(farm) => farm,
        Err(e) => return e.into_response(),
    };

    let mut detail = match zone_detail(&farm, &zone_id) {
        Ok(detail) => detail,
        Err(e) => return e.into_response(),
    };

    if let Some(request) = NarrativeRequest::for_cell(&detail.zone_id, &detail.cell) {
        match state.narrative.explain(&request).await {
            Ok(text) => detail.explanation = Some(text),
            Err(e) => {
                tracing::warn!(farm_id = %farm_id, zone_id = %zone_id, "Explanation unavailable: {}", e);
            }
        }
    }

    (StatusCode::OK, Json(detail)).into_response()
}
