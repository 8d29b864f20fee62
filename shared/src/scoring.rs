//! Variance-based risk scoring
//!
//! Turns a window of noisy readings (moisture, NDVI or any per-zone index)
//! into a bounded 0-100 score and a Low/Medium/High label. Unevenness is
//! measured with the coefficient of variation; a worsening spread against
//! the previous window adds a small trend penalty.

use crate::math::{clamp, clamp01, finite_values, mean, population_std, round_half_up, round_to};
use crate::models::{RiskAssessment, RiskDetails, RiskLabel};

/// Windows with fewer readings than this are not scored
pub const MIN_READINGS: usize = 3;

/// CV at or above this counts as maximal unevenness
pub const CV_CEILING: f64 = 0.7;

pub const CV_WEIGHT: f64 = 0.85;
pub const TREND_WEIGHT: f64 = 0.15;

/// Guards the trend penalty against a near-zero previous spread
pub const TREND_EPSILON: f64 = 1e-6;

/// Score a window of readings, optionally against the previous window.
///
/// Fewer than [`MIN_READINGS`] usable values yields Low/0 with a reason in
/// the details; callers should not treat that as an error.
pub fn score_readings(readings: &[f64], previous_window: Option<&[f64]>) -> RiskAssessment {
    if readings.len() < MIN_READINGS {
        return RiskAssessment::insufficient("Not enough data");
    }

    let cleaned = finite_values(readings);
    if cleaned.len() < MIN_READINGS {
        return RiskAssessment::insufficient("Not enough numeric data");
    }

    let mean_value = mean(&cleaned);
    let std_value = population_std(&cleaned);

    let cv = if mean_value == 0.0 {
        0.0
    } else {
        std_value / mean_value.abs()
    };

    let trend_penalty = previous_window
        .filter(|prev| prev.len() >= MIN_READINGS)
        .map(finite_values)
        .filter(|prev| prev.len() >= MIN_READINGS)
        .map(|prev| {
            let prev_std = population_std(&prev);
            clamp01((std_value - prev_std) / (prev_std.abs() + TREND_EPSILON))
        })
        .unwrap_or(0.0);

    let cv_score = clamp01(cv / CV_CEILING);
    let raw = 100.0 * (CV_WEIGHT * cv_score + TREND_WEIGHT * trend_penalty);
    let score = round_half_up(clamp(raw, 0.0, 100.0)) as u8;

    RiskAssessment {
        score,
        label: RiskLabel::from_score(score),
        details: RiskDetails::Computed {
            mean: round_to(mean_value, 2),
            std: round_to(std_value, 2),
            cv: round_to(cv, 3),
            trend_penalty: round_to(trend_penalty, 3),
        },
    }
}
