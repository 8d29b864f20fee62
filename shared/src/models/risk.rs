//! Variance risk score models

use serde::{Deserialize, Serialize};

/// Scores at or above this are High
pub const HIGH_RISK_SCORE: u8 = 70;
/// Scores at or above this (and below High) are Medium
pub const MEDIUM_RISK_SCORE: u8 = 40;

/// Discrete risk band for a 0-100 score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RiskLabel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// Band a 0-100 score. Every component that turns a score into a label goes through here.
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_SCORE {
            RiskLabel::High
        } else if score >= MEDIUM_RISK_SCORE {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "Low"),
            RiskLabel::Medium => write!(f, "Medium"),
            RiskLabel::High => write!(f, "High"),
        }
    }
}

/// Diagnostics behind a risk score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RiskDetails {
    /// Too few usable readings; the score defaults to Low/0
    Insufficient { reason: String },
    /// Statistics of a scored window
    #[serde(rename_all = "camelCase")]
    Computed {
        /// Rounded to 2 decimals
        mean: f64,
        /// Rounded to 2 decimals
        std: f64,
        /// Rounded to 3 decimals
        cv: f64,
        /// Rounded to 3 decimals
        trend_penalty: f64,
    },
}

/// Output of the variance risk scorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub score: u8,
    pub label: RiskLabel,
    pub details: RiskDetails,
}

impl RiskAssessment {
    /// Safe default for windows that cannot be scored
    pub fn insufficient(reason: &str) -> Self {
        Self {
            score: 0,
            label: RiskLabel::Low,
            details: RiskDetails::Insufficient {
                reason: reason.to_string(),
            },
        }
    }

    /// Whether the score came from too little data rather than a computed zero
    pub fn is_insufficient(&self) -> bool {
        matches!(self.details, RiskDetails::Insufficient { .. })
    }
}
