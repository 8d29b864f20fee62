//! WebAssembly module for the Farm Risk Dashboard
//!
//! Provides client-side computation for:
//! - Variance risk scoring of sensor windows
//! - Deterministic demo seeding
//! - Dashboard summaries and zone classification

use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{score_readings, seed, summarize, RiskAssessment};

/// Scoring input as sent by the browser; non-numeric entries are dropped
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreInput {
    readings: Vec<serde_json::Value>,
    #[serde(default)]
    previous_window: Option<Vec<serde_json::Value>>,
}

fn numeric(values: &[serde_json::Value]) -> Vec<f64> {
    values.iter().filter_map(serde_json::Value::as_f64).collect()
}

fn assess_json(input_json: &str) -> Result<RiskAssessment, String> {
    let input: ScoreInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid readings JSON: {}", e))?;
    let readings = numeric(&input.readings);
    let previous = input.previous_window.as_deref().map(numeric);
    Ok(score_readings(&readings, previous.as_deref()))
}

fn summary_json(grid_json: &str, history: &[u8]) -> Result<String, String> {
    let grid: Grid =
        serde_json::from_str(grid_json).map_err(|e| format!("Invalid grid JSON: {}", e))?;
    let history = (!history.is_empty()).then_some(history);
    serde_json::to_string(&summarize(Some(&grid), history)).map_err(|e| e.to_string())
}

/// Score `{ readings, previousWindow? }`; returns the assessment as JSON
#[wasm_bindgen]
pub fn score_variance(input_json: &str) -> Result<String, JsValue> {
    let assessment = assess_json(input_json).map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&assessment).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Score a plain window of readings
#[wasm_bindgen]
pub fn score_window(readings: &[f64]) -> u8 {
    score_readings(readings, None).score
}

/// Seed a demo farm; returns grid, history, baseline and anomalies as JSON
#[wasm_bindgen]
pub fn seed_farm(farm_id: &str, grid_size: u8) -> Result<String, JsValue> {
    let seeded = seed(farm_id, grid_size).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&seeded).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The seeded 30-day history only, for charting
#[wasm_bindgen]
pub fn seeded_history(farm_id: &str, grid_size: u8) -> Result<js_sys::Uint8Array, JsValue> {
    let seeded = seed(farm_id, grid_size).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(js_sys::Uint8Array::from(seeded.history.as_slice()))
}

/// Summarize a grid snapshot and history; a bad grid yields the default summary
#[wasm_bindgen]
pub fn summarize_snapshot(grid_json: &str, history: &[u8]) -> String {
    match summary_json(grid_json, history) {
        Ok(json) => json,
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&e));
            let fallback = summarize(None, (!history.is_empty()).then_some(history));
            serde_json::to_string(&fallback).unwrap_or_default()
        }
    }
}

/// Label for a 0-100 risk score
#[wasm_bindgen]
pub fn classify_score(score: u8) -> String {
    RiskLabel::from_score(score).to_string()
}

/// Level ("green" | "yellow" | "red") for a zone's readings
#[wasm_bindgen]
pub fn classify_zone(ndvi: f64, moisture: f64) -> String {
    ZoneLevel::classify(clamp(ndvi), clamp(moisture))
        .as_str()
        .to_string()
}

fn clamp(value: f64) -> f64 {
    shared::math::clamp01(value)
}
