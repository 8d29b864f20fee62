//! Field grid models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::zone::{Cell, ZoneLevel};
use crate::math::{mean, round_to};

/// Grid edge used when a farm is registered without one
pub const DEFAULT_GRID_SIZE: u8 = 8;

/// Mean vegetation index and moisture across populated zones
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldAverages {
    pub ndvi: f64,
    pub moisture: f64,
}

/// An N×N grid of zones keyed by zone id ("A1" .. )
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub size: u8,
    #[serde(default)]
    pub cells: BTreeMap<String, Cell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_averages: Option<FieldAverages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Grid {
    /// Grid of a freshly registered farm: known size, no zones yet
    pub fn empty(size: u8) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
            field_averages: None,
            updated_at: None,
        }
    }

    /// Number of zones at `level`
    pub fn count_level(&self, level: ZoneLevel) -> u32 {
        self.cells.values().filter(|c| c.level == level).count() as u32
    }

    /// Recompute field averages from the populated cells, rounded to 2 decimals.
    /// Cells without readings are skipped; `None` if no cell has readings.
    pub fn recompute_averages(&mut self) {
        let ndvi: Vec<f64> = self.cells.values().filter_map(|c| c.ndvi).collect();
        let moisture: Vec<f64> = self.cells.values().filter_map(|c| c.moisture).collect();
        self.field_averages = if ndvi.is_empty() || moisture.is_empty() {
            None
        } else {
            Some(FieldAverages {
                ndvi: round_to(mean(&ndvi), 2),
                moisture: round_to(mean(&moisture), 2),
            })
        };
    }

    /// Stamp the grid and every cell with `at`
    pub fn touch(&mut self, at: DateTime<Utc>) {
        for cell in self.cells.values_mut() {
            cell.updated_at = Some(at);
        }
        self.updated_at = Some(at);
    }
}
