//! Dashboard summary of a farm snapshot
//!
//! Folds the latest grid and variance history into the counts, risk level
//! and trend the dashboard shows. Missing state never fails: the result is
//! always a fully populated summary.

use crate::math::round_half_up;
use crate::models::{Grid, GridSummary, RiskLabel, TrendDirection, ZoneLevel};

/// Zone count shown when neither cells nor a grid size are known
pub const FALLBACK_TOTAL_ZONES: u32 = 64;

/// Shorter histories are too noisy to call a trend
pub const MIN_TREND_POINTS: usize = 8;

/// Day-over-day change that counts as movement
pub const TREND_DELTA: i16 = 3;

/// Length of the placeholder series
pub const FALLBACK_HISTORY_DAYS: usize = 30;

/// Calm placeholder series shown before any history is stored
pub fn fallback_history() -> Vec<u8> {
    (0..FALLBACK_HISTORY_DAYS)
        .map(|i| {
            let bump = if i > 20 { 8.0 } else { 0.0 };
            round_half_up(35.0 + 10.0 * (i as f64 / 4.0).sin() + bump) as u8
        })
        .collect()
}

/// Classify the last day-over-day move of `history`
pub fn trend_direction(history: &[u8]) -> TrendDirection {
    if history.len() < MIN_TREND_POINTS {
        return TrendDirection::Stable;
    }
    let last = i16::from(history[history.len() - 1]);
    let previous = i16::from(history[history.len() - 2]);
    let delta = last - previous;
    if delta >= TREND_DELTA {
        TrendDirection::Rising
    } else if delta <= -TREND_DELTA {
        TrendDirection::Improving
    } else {
        TrendDirection::Stable
    }
}

/// Overall risk from zone counts: any red is High, any yellow is Medium
pub fn risk_level_from_zones(red_zones: u32, yellow_zones: u32) -> RiskLabel {
    if red_zones > 0 {
        RiskLabel::High
    } else if yellow_zones > 0 {
        RiskLabel::Medium
    } else {
        RiskLabel::Low
    }
}

/// Summarize a snapshot. Either input may be missing.
///
/// Risk score and trend come from stored history only; when there is none
/// the summary carries the placeholder series flagged as fallback.
pub fn summarize(grid: Option<&Grid>, history: Option<&[u8]>) -> GridSummary {
    let red_zones = grid.map_or(0, |g| g.count_level(ZoneLevel::Red));
    let yellow_zones = grid.map_or(0, |g| g.count_level(ZoneLevel::Yellow));

    let total_zones = match grid {
        Some(g) if !g.cells.is_empty() => g.cells.len() as u32,
        Some(g) if g.size > 0 => u32::from(g.size).pow(2),
        _ => FALLBACK_TOTAL_ZONES,
    };

    let stored = history.filter(|h| !h.is_empty());
    let risk_score = stored
        .and_then(|h| h.last().copied())
        .map_or(0, |score| score.min(100));
    let trend = stored.map_or(TrendDirection::Stable, trend_direction);

    let (history, history_is_fallback) = match stored {
        Some(h) => (h.to_vec(), false),
        None => (fallback_history(), true),
    };

    GridSummary {
        red_zones,
        yellow_zones,
        total_zones,
        risk_level: risk_level_from_zones(red_zones, yellow_zones),
        risk_score,
        trend_direction: trend,
        history,
        history_is_fallback,
    }
}

impl Default for GridSummary {
    fn default() -> Self {
        summarize(None, None)
    }
}
