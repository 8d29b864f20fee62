//! Deterministic synthetic farm data
//!
//! Seeds a new farm's grid and 30-day variance history before real sensor
//! data exists. Output depends only on the farm id and grid size, so
//! re-seeding the same farm always reproduces the same snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{clamp, clamp01, mean, round_half_up, round_to};
use crate::models::{
    zone_id, Cell, FieldAverages, Grid, VarianceHistory, ZoneAdvice, ZoneLevel, MAX_GRID_SIZE,
};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Number of synthetic history days
pub const HISTORY_DAYS: usize = 30;

/// Errors from seeding a farm
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Grid size must be between 1 and {max}, got {size}")]
    InvalidGridSize { size: u8, max: u8 },
}

/// 32-bit FNV-1a over the UTF-16 code units of `farm_id`
pub fn seed_from_farm_id(farm_id: &str) -> u32 {
    farm_id.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Linear congruential generator yielding values in `[0, 1)`
#[derive(Debug, Clone)]
pub struct FarmRng {
    state: u32,
}

impl FarmRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn for_farm(farm_id: &str) -> Self {
        Self::new(seed_from_farm_id(farm_id))
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        f64::from(self.state) / 4_294_967_296.0
    }

    /// Uniform draw centred on zero, `(rand - 0.5) * width`
    fn centred(&mut self, width: f64) -> f64 {
        (self.next_f64() - 0.5) * width
    }
}

/// Farm-wide starting conditions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Baseline {
    pub ndvi: f64,
    pub moisture: f64,
}

/// Placement of the injected irrigation and nutrient defects
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Anomalies {
    /// Row of the 3-zone dry strip
    pub dry_row: i64,
    /// First column of the dry strip; may be -1 on a 1-wide grid
    pub dry_col_start: i64,
    pub weak_row: i64,
    pub weak_col: i64,
}

impl Anomalies {
    fn in_dry_strip(&self, row: i64, col: i64) -> bool {
        row == self.dry_row && col >= self.dry_col_start && col <= self.dry_col_start + 2
    }

    fn is_weak_patch(&self, row: i64, col: i64) -> bool {
        row == self.weak_row && col == self.weak_col
    }
}

/// Output of [`seed`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeededFarm {
    pub grid: Grid,
    pub history: VarianceHistory,
    pub baseline: Baseline,
    pub anomalies: Anomalies,
}

/// Floor of `rand * span` as a signed index
fn draw_index(rng: &mut FarmRng, span: f64) -> i64 {
    (rng.next_f64() * span).floor() as i64
}

/// Generate a reproducible grid and history for `farm_id`.
///
/// Timestamps are left unset; the store stamps them when persisting.
pub fn seed(farm_id: &str, grid_size: u8) -> Result<SeededFarm, SeedError> {
    if grid_size == 0 || grid_size > MAX_GRID_SIZE {
        return Err(SeedError::InvalidGridSize {
            size: grid_size,
            max: MAX_GRID_SIZE,
        });
    }

    let mut rng = FarmRng::for_farm(farm_id);
    let n = f64::from(grid_size);

    let baseline = Baseline {
        ndvi: 0.55 + rng.centred(0.08),
        moisture: 0.45 + rng.centred(0.12),
    };

    let anomalies = Anomalies {
        dry_row: draw_index(&mut rng, n),
        dry_col_start: draw_index(&mut rng, n - 2.0),
        weak_row: draw_index(&mut rng, n),
        weak_col: draw_index(&mut rng, n),
    };

    let mut cells = BTreeMap::new();
    let mut ndvi_values = Vec::with_capacity(usize::from(grid_size).pow(2));
    let mut moisture_values = Vec::with_capacity(usize::from(grid_size).pow(2));

    for row in 0..grid_size {
        for col in 0..grid_size {
            let mut ndvi = baseline.ndvi + rng.centred(0.18);
            let mut moisture = baseline.moisture + rng.centred(0.22);

            let (r, c) = (i64::from(row), i64::from(col));
            if anomalies.in_dry_strip(r, c) {
                moisture -= 0.22 + rng.next_f64() * 0.08;
            }
            if anomalies.is_weak_patch(r, c) {
                ndvi -= 0.25 + rng.next_f64() * 0.08;
            }

            let ndvi = clamp01(ndvi);
            let moisture = clamp01(moisture);
            ndvi_values.push(ndvi);
            moisture_values.push(moisture);

            // Classify on the exact values; only the stored copy is rounded
            let level = ZoneLevel::classify(ndvi, moisture);
            let advice = ZoneAdvice::for_zone(level, moisture);
            cells.insert(
                zone_id(row, col),
                Cell {
                    level,
                    signal: advice.signal,
                    suggested_action: advice.suggested_action,
                    ndvi: Some(round_to(ndvi, 2)),
                    moisture: Some(round_to(moisture, 2)),
                    updated_at: None,
                },
            );
        }
    }

    let grid = Grid {
        size: grid_size,
        cells,
        field_averages: Some(FieldAverages {
            ndvi: round_to(mean(&ndvi_values), 2),
            moisture: round_to(mean(&moisture_values), 2),
        }),
        updated_at: None,
    };

    let history = synthesize_history(&mut rng);

    Ok(SeededFarm {
        grid,
        history,
        baseline,
        anomalies,
    })
}

/// Mildly upward-trending random walk of daily variance scores
fn synthesize_history(rng: &mut FarmRng) -> VarianceHistory {
    let mut drift = 0.0;
    let scores = (0..HISTORY_DAYS).map(|day| {
        drift += rng.centred(4.0);
        let noise = rng.centred(10.0);
        let score = clamp(32.0 + day as f64 * 0.7 + drift + noise, 0.0, 100.0);
        round_half_up(score) as u8
    });
    VarianceHistory::from_scores(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fnv_known_values() {
        assert_eq!(seed_from_farm_id(""), 2_166_136_261);
        assert_eq!(seed_from_farm_id("a"), 0xe40c_292c);
        assert_eq!(seed_from_farm_id("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_lcg_first_draw() {
        let mut rng = FarmRng::new(0);
        assert_eq!(rng.next_f64(), 1_013_904_223.0 / 4_294_967_296.0);
        let next = rng.next_f64();
        assert!((0.0..1.0).contains(&next));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = seed("farm-123", 8).unwrap();
        let b = seed("farm-123", 8).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a.grid).unwrap(),
            serde_json::to_string(&b.grid).unwrap()
        );
    }

    #[test]
    fn test_seed_depends_on_farm_id() {
        let a = seed("farm-123", 8).unwrap();
        let b = seed("farm-456", 8).unwrap();
        assert_ne!(a.baseline, b.baseline);
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_grid_shape() {
        let farm = seed("farm-123", 8).unwrap();
        assert_eq!(farm.grid.size, 8);
        assert_eq!(farm.grid.cells.len(), 64);
        assert!(farm.grid.cells.contains_key("A1"));
        assert!(farm.grid.cells.contains_key("H8"));
        assert!(!farm.grid.cells.contains_key("I1"));
        assert!(farm.grid.updated_at.is_none());
    }

    #[test]
    fn test_baseline_ranges() {
        let farm = seed("farm-123", 8).unwrap();
        assert!(farm.baseline.ndvi >= 0.51 && farm.baseline.ndvi < 0.59);
        assert!(farm.baseline.moisture >= 0.39 && farm.baseline.moisture < 0.51);
    }

    #[test]
    fn test_history_shape() {
        let farm = seed("farm-123", 8).unwrap();
        assert_eq!(farm.history.len(), HISTORY_DAYS);
        assert!(farm.history.as_slice().iter().all(|s| *s <= 100));
    }

    #[test]
    fn test_cells_match_catalog() {
        let farm = seed("farm-123", 8).unwrap();
        for cell in farm.grid.cells.values() {
            let expected_signals: &[&str] = match cell.level {
                ZoneLevel::Red => &["Severe dryness detected.", "Critical plant stress detected."],
                ZoneLevel::Yellow => &["Moisture is dropping.", "Plant health is uneven."],
                ZoneLevel::Green => &["Zone looks stable."],
            };
            assert!(expected_signals.contains(&cell.signal.as_str()));
        }
    }

    #[test]
    fn test_field_averages_present() {
        let farm = seed("farm-123", 8).unwrap();
        let averages = farm.grid.field_averages.unwrap();
        assert!((0.0..=1.0).contains(&averages.ndvi));
        assert!((0.0..=1.0).contains(&averages.moisture));
        assert_eq!(averages.ndvi, round_to(averages.ndvi, 2));
    }

    #[test]
    fn test_invalid_grid_sizes() {
        assert_eq!(
            seed("farm-123", 0),
            Err(SeedError::InvalidGridSize { size: 0, max: 26 })
        );
        assert!(seed("farm-123", 27).is_err());
        assert!(seed("farm-123", 26).is_ok());
    }

    fn assert_cell(farm: &SeededFarm, zone: &str, level: ZoneLevel, ndvi: f64, moisture: f64) {
        let cell = &farm.grid.cells[zone];
        assert_eq!(cell.level, level, "level of {}", zone);
        assert_eq!(cell.ndvi, Some(ndvi), "ndvi of {}", zone);
        assert_eq!(cell.moisture, Some(moisture), "moisture of {}", zone);
    }

    #[test]
    fn test_golden_eight_by_eight() {
        let farm = seed("farm-123", 8).unwrap();

        assert_eq!(
            farm.grid.field_averages,
            Some(FieldAverages { ndvi: 0.55, moisture: 0.46 })
        );
        assert_eq!(
            farm.anomalies,
            Anomalies { dry_row: 6, dry_col_start: 4, weak_row: 5, weak_col: 4 }
        );
        assert_eq!(
            farm.history.as_slice(),
            &[
                30, 33, 32, 42, 42, 36, 37, 37, 43, 50, 45, 48, 41, 48, 46, 47, 38, 41, 41, 39,
                45, 44, 38, 44, 44, 39, 45, 45, 38, 46,
            ]
        );

        assert_cell(&farm, "A1", ZoneLevel::Green, 0.56, 0.45);
        assert_cell(&farm, "H8", ZoneLevel::Green, 0.49, 0.38);
        // Weak patch
        assert_cell(&farm, "F5", ZoneLevel::Red, 0.31, 0.37);
        assert_eq!(farm.grid.cells["F5"].signal, "Critical plant stress detected.");
        // Dry strip
        assert_cell(&farm, "G5", ZoneLevel::Red, 0.48, 0.24);
        assert_cell(&farm, "G6", ZoneLevel::Red, 0.59, 0.22);
        assert_cell(&farm, "G7", ZoneLevel::Red, 0.59, 0.15);
        assert_eq!(farm.grid.cells["G7"].signal, "Severe dryness detected.");
        assert_cell(&farm, "G8", ZoneLevel::Green, 0.51, 0.53);

        assert_eq!(farm.grid.count_level(ZoneLevel::Red), 4);
        assert_eq!(farm.grid.count_level(ZoneLevel::Yellow), 0);
    }

    #[test]
    fn test_one_by_one_grid() {
        let farm = seed("farm-123", 1).unwrap();
        assert_eq!(farm.grid.cells.len(), 1);
        // The strip starts off the left edge and is clipped to the grid
        assert_eq!(
            farm.anomalies,
            Anomalies { dry_row: 0, dry_col_start: -1, weak_row: 0, weak_col: 0 }
        );
        assert_cell(&farm, "A1", ZoneLevel::Red, 0.25, 0.18);
        assert_eq!(farm.grid.cells["A1"].signal, "Severe dryness detected.");
        assert_eq!(
            farm.grid.field_averages,
            Some(FieldAverages { ndvi: 0.25, moisture: 0.18 })
        );
        assert_eq!(&farm.history.as_slice()[..5], &[26, 31, 37, 36, 35]);
        assert_eq!(farm.history.latest(), Some(45));
    }

    #[test]
    fn test_two_by_two_grid() {
        let farm = seed("farm-123", 2).unwrap();
        assert_eq!(farm.grid.cells.len(), 4);
        assert_eq!(
            farm.anomalies,
            Anomalies { dry_row: 1, dry_col_start: 0, weak_row: 1, weak_col: 1 }
        );
        assert_cell(&farm, "A1", ZoneLevel::Green, 0.56, 0.45);
        assert_cell(&farm, "A2", ZoneLevel::Green, 0.59, 0.54);
        assert_cell(&farm, "B1", ZoneLevel::Red, 0.53, 0.13);
        assert_cell(&farm, "B2", ZoneLevel::Red, 0.3, 0.24);
        assert_eq!(
            farm.grid.field_averages,
            Some(FieldAverages { ndvi: 0.5, moisture: 0.34 })
        );
        assert_eq!(&farm.history.as_slice()[..5], &[36, 37, 31, 39, 35]);
        assert_eq!(farm.history.latest(), Some(62));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every seeded grid is full, clamped and in range
        #[test]
        fn prop_seeded_grid_well_formed(farm_id in "[a-zA-Z0-9-]{1,24}", size in 1u8..=26) {
            let farm = seed(&farm_id, size).unwrap();
            prop_assert_eq!(farm.grid.cells.len(), usize::from(size) * usize::from(size));
            for cell in farm.grid.cells.values() {
                let ndvi = cell.ndvi.unwrap();
                let moisture = cell.moisture.unwrap();
                prop_assert!((0.0..=1.0).contains(&ndvi));
                prop_assert!((0.0..=1.0).contains(&moisture));
            }
            prop_assert!(farm.anomalies.dry_row >= 0 && farm.anomalies.dry_row < i64::from(size));
            prop_assert!(farm.anomalies.weak_col >= 0 && farm.anomalies.weak_col < i64::from(size));
            prop_assert_eq!(farm.history.len(), HISTORY_DAYS);
        }

        /// Same id and size reproduce the same farm
        #[test]
        fn prop_seed_reproducible(farm_id in ".{0,32}", size in 1u8..=12) {
            prop_assert_eq!(seed(&farm_id, size), seed(&farm_id, size));
        }
    }
}
