//! Variance history and dashboard summary models

use serde::{Deserialize, Serialize};

use super::risk::RiskLabel;

/// Day-over-day movement of the variance score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TrendDirection {
    Rising,
    Improving,
    #[default]
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Rising => write!(f, "Rising"),
            TrendDirection::Improving => write!(f, "Improving"),
            TrendDirection::Stable => write!(f, "Stable"),
        }
    }
}

/// Daily variance scores, oldest first, at most [`VarianceHistory::MAX_DAYS`] long
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct VarianceHistory(Vec<u8>);

impl VarianceHistory {
    pub const MAX_DAYS: usize = 30;

    /// Build from stored scores, keeping the newest `MAX_DAYS` and clamping to 0-100
    pub fn from_scores(scores: impl IntoIterator<Item = u8>) -> Self {
        let mut history = Self::default();
        for score in scores {
            history.push(score);
        }
        history
    }

    /// Append today's score, dropping the oldest day once full
    pub fn push(&mut self, score: u8) {
        self.0.push(score.min(100));
        if self.0.len() > Self::MAX_DAYS {
            let excess = self.0.len() - Self::MAX_DAYS;
            self.0.drain(..excess);
        }
    }

    pub fn latest(&self) -> Option<u8> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Display-ready aggregate of a farm's latest snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    pub red_zones: u32,
    pub yellow_zones: u32,
    pub total_zones: u32,
    /// Driven by zone counts, not by `risk_score`
    pub risk_level: RiskLabel,
    pub risk_score: u8,
    pub trend_direction: TrendDirection,
    pub history: Vec<u8>,
    /// True when `history` is the synthetic placeholder rather than stored scores
    pub history_is_fallback: bool,
}
