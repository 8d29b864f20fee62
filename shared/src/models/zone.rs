//! Grid zone models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::risk::RiskLabel;

/// Largest supported grid edge; one row letter per row (A-Z)
pub const MAX_GRID_SIZE: u8 = 26;

/// Moisture below this is severe dryness
pub const RED_MOISTURE_THRESHOLD: f64 = 0.25;
/// NDVI below this is critical plant stress
pub const RED_NDVI_THRESHOLD: f64 = 0.33;
/// Moisture below this is early dryness
pub const YELLOW_MOISTURE_THRESHOLD: f64 = 0.35;
/// NDVI below this is uneven plant health
pub const YELLOW_NDVI_THRESHOLD: f64 = 0.45;

/// Traffic-light level of a single zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZoneLevel {
    #[default]
    Green,
    Yellow,
    Red,
}

impl ZoneLevel {
    /// Classify a zone from its vegetation index and soil moisture.
    /// Red is checked before yellow.
    pub fn classify(ndvi: f64, moisture: f64) -> Self {
        if moisture < RED_MOISTURE_THRESHOLD || ndvi < RED_NDVI_THRESHOLD {
            ZoneLevel::Red
        } else if moisture < YELLOW_MOISTURE_THRESHOLD || ndvi < YELLOW_NDVI_THRESHOLD {
            ZoneLevel::Yellow
        } else {
            ZoneLevel::Green
        }
    }

    /// Risk label shown for a zone of this level
    pub fn risk_label(&self) -> RiskLabel {
        match self {
            ZoneLevel::Red => RiskLabel::High,
            ZoneLevel::Yellow => RiskLabel::Medium,
            ZoneLevel::Green => RiskLabel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneLevel::Green => "green",
            ZoneLevel::Yellow => "yellow",
            ZoneLevel::Red => "red",
        }
    }
}

impl std::fmt::Display for ZoneLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cause and remediation text attached to a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneAdvice {
    pub signal: String,
    pub suggested_action: String,
}

impl ZoneAdvice {
    fn new(signal: &str, suggested_action: &str) -> Self {
        Self {
            signal: signal.to_string(),
            suggested_action: suggested_action.to_string(),
        }
    }

    /// Pick the message for a classified zone. Moisture-driven messages win
    /// over NDVI-driven ones at the same level.
    pub fn for_zone(level: ZoneLevel, moisture: f64) -> Self {
        match level {
            ZoneLevel::Red if moisture < RED_MOISTURE_THRESHOLD => Self::new(
                "Severe dryness detected.",
                "Irrigate this zone now. Check pipes/emitters for blockage.",
            ),
            ZoneLevel::Red => Self::new(
                "Critical plant stress detected.",
                "Inspect leaves and soil; consider targeted nutrient correction and pest check.",
            ),
            ZoneLevel::Yellow if moisture < YELLOW_MOISTURE_THRESHOLD => Self::new(
                "Moisture is dropping.",
                "Check irrigation flow and water this zone lightly today.",
            ),
            ZoneLevel::Yellow => Self::new(
                "Plant health is uneven.",
                "Walk this zone and check for pests, nutrient issues, or early disease.",
            ),
            ZoneLevel::Green => Self::new("Zone looks stable.", "No action needed. Keep monitoring."),
        }
    }

    /// Advice shown for a zone that has no stored cell yet
    pub fn placeholder(zone_id: &str) -> Self {
        Self {
            signal: format!("Zone {} looks stable.", zone_id),
            suggested_action: "No action needed. Keep monitoring.".to_string(),
        }
    }
}

/// One grid zone of a farm's field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub level: ZoneLevel,
    pub signal: String,
    pub suggested_action: String,
    /// Vegetation index, 0-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndvi: Option<f64>,
    /// Soil moisture, 0-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cell {
    /// Build a cell from raw readings; values are clamped to `[0, 1]`
    pub fn from_readings(ndvi: f64, moisture: f64) -> Self {
        let ndvi = crate::math::clamp01(ndvi);
        let moisture = crate::math::clamp01(moisture);
        let level = ZoneLevel::classify(ndvi, moisture);
        let advice = ZoneAdvice::for_zone(level, moisture);
        Self {
            level,
            signal: advice.signal,
            suggested_action: advice.suggested_action,
            ndvi: Some(ndvi),
            moisture: Some(moisture),
            updated_at: None,
        }
    }

    /// Green cell for a zone with no stored readings
    pub fn placeholder(zone_id: &str) -> Self {
        let advice = ZoneAdvice::placeholder(zone_id);
        Self {
            level: ZoneLevel::Green,
            signal: advice.signal,
            suggested_action: advice.suggested_action,
            ndvi: None,
            moisture: None,
            updated_at: None,
        }
    }
}

/// Errors from parsing zone identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneIdError {
    #[error("Zone id must be a row letter followed by a column number")]
    Malformed,

    #[error("Zone {zone_id} is outside a {size}x{size} grid")]
    OutOfGrid { zone_id: String, size: u8 },
}

/// Zone identifier for (`row`, `col`), both zero-based: row 2, col 3 is "C4".
///
/// `row` must be below [`MAX_GRID_SIZE`]; there is no letter past "Z".
pub fn zone_id(row: u8, col: u8) -> String {
    debug_assert!(row < MAX_GRID_SIZE, "row {} has no zone letter", row);
    let letter = char::from(b'A' + row);
    format!("{}{}", letter, u32::from(col) + 1)
}

/// Parse "C4" back into zero-based (row, col)
pub fn parse_zone_id(zone_id: &str) -> Result<(u8, u8), ZoneIdError> {
    let mut chars = zone_id.chars();
    let letter = chars.next().ok_or(ZoneIdError::Malformed)?;
    if !letter.is_ascii_uppercase() {
        return Err(ZoneIdError::Malformed);
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ZoneIdError::Malformed);
    }
    let number: u8 = digits.parse().map_err(|_| ZoneIdError::Malformed)?;
    if number == 0 || number > MAX_GRID_SIZE {
        return Err(ZoneIdError::Malformed);
    }
    Ok((letter as u8 - b'A', number - 1))
}

/// Parse a zone id and check it falls inside a `size`×`size` grid
pub fn parse_zone_id_in_grid(zone_id: &str, size: u8) -> Result<(u8, u8), ZoneIdError> {
    let (row, col) = parse_zone_id(zone_id)?;
    if row >= size || col >= size {
        return Err(ZoneIdError::OutOfGrid {
            zone_id: zone_id.to_string(),
            size,
        });
    }
    Ok((row, col))
}
