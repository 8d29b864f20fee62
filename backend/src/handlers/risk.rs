//! Stateless risk scoring handler

use axum::{http::StatusCode, response::IntoResponse, Json};
use shared::{score_readings, validate_reading_window};

use crate::error::AppError;
use crate::services::farm::VarianceInput;

/// Score a window of readings without touching any farm
pub async fn score_risk(Json(input): Json<VarianceInput>) -> impl IntoResponse {
    if let Err(msg) = validate_reading_window(&input.readings) {
        return AppError::invalid("readings", msg).into_response();
    }
    if let Some(Err(msg)) = input.previous_window.as_deref().map(validate_reading_window) {
        return AppError::invalid("previous_window", msg).into_response();
    }

    let assessment = score_readings(&input.readings, input.previous_window.as_deref());
    tracing::debug!(score = assessment.score, label = %assessment.label, "Scored readings");

    (StatusCode::OK, Json(assessment)).into_response()
}
