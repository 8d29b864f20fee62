//! Plain-English zone explanations
//!
//! The text itself comes from an external generator; this module owns the
//! request shape, the prompt and the fallback wording used when the
//! generator is unavailable or returns nothing.

use serde::{Deserialize, Serialize};

use crate::models::{Cell, RiskLabel, ZoneLevel};

/// What the generator is told about a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub zone_id: String,
    pub level: RiskLabel,
    pub signal: String,
    pub suggested_action: String,
}

impl NarrativeRequest {
    /// Only red zones get an explanation
    pub fn for_cell(zone_id: &str, cell: &Cell) -> Option<Self> {
        if cell.level != ZoneLevel::Red {
            return None;
        }
        Some(Self {
            zone_id: zone_id.to_string(),
            level: cell.level.risk_label(),
            signal: cell.signal.clone(),
            suggested_action: cell.suggested_action.clone(),
        })
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are an agronomy assistant. Write 2 short sentences in plain English for a non-technical farmer. \
             Avoid jargon, keep it calm and actionable.\n\n\
             Zone: {}\nRisk: {}\nSignal: {}\nSuggested action: {}",
            self.zone_id, self.level, self.signal, self.suggested_action
        )
    }

    /// Text used when no generator is configured
    pub fn offline_text(&self) -> String {
        format!(
            "Zone {} risk is {}. {} Suggested action: {}",
            self.zone_id, self.level, self.signal, self.suggested_action
        )
    }

    /// Text used when the generator answers with nothing
    pub fn empty_reply_text(&self) -> String {
        format!(
            "Zone {} risk is {}. {}",
            self.zone_id, self.level, self.suggested_action
        )
    }

    /// Trim a generator reply, falling back when it is blank
    pub fn finish_reply(&self, reply: &str) -> String {
        let trimmed = reply.trim();
        if trimmed.is_empty() {
            self.empty_reply_text()
        } else {
            trimmed.to_string()
        }
    }
}
