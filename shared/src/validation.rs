//! Validation utilities for the farm risk dashboard

use crate::models::{parse_zone_id_in_grid, MAX_GRID_SIZE};
use crate::types::GeoPoint;

// ============================================================================
// Field Validations
// ============================================================================

/// Validate a grid edge length (one row letter per row)
pub fn validate_grid_size(size: u8) -> Result<(), &'static str> {
    if size == 0 {
        return Err("Grid size must be at least 1");
    }
    if size > MAX_GRID_SIZE {
        return Err("Grid size must be at most 26");
    }
    Ok(())
}

/// Validate a field boundary polygon
pub fn validate_field_polygon(polygon: &[GeoPoint]) -> Result<(), &'static str> {
    if polygon.len() < 3 {
        return Err("Field polygon is required (at least 3 points)");
    }
    if !polygon.iter().all(GeoPoint::is_valid) {
        return Err("Field polygon has coordinates out of range");
    }
    Ok(())
}

/// Validate a zone id against a grid size
pub fn validate_zone_id(zone_id: &str, grid_size: u8) -> Result<(), &'static str> {
    parse_zone_id_in_grid(zone_id, grid_size)
        .map(|_| ())
        .map_err(|_| "Zone id is not part of this grid")
}

// ============================================================================
// Reading Validations
// ============================================================================

/// Validate a normalised index reading (NDVI or moisture)
pub fn validate_unit_reading(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Reading must be a finite number");
    }
    if !(0.0..=1.0).contains(&value) {
        return Err("Reading must be between 0 and 1");
    }
    Ok(())
}

/// Validate that a sensor window is not absurdly large
pub fn validate_reading_window(readings: &[f64]) -> Result<(), &'static str> {
    if readings.len() > MAX_WINDOW_READINGS {
        return Err("Too many readings in one window");
    }
    Ok(())
}

/// Upper bound on readings accepted per scoring request
pub const MAX_WINDOW_READINGS: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn point(lat: i64, lng: i64) -> GeoPoint {
        GeoPoint::new(Decimal::new(lat, 4), Decimal::new(lng, 4))
    }

    #[test]
    fn test_validate_grid_size() {
        assert!(validate_grid_size(1).is_ok());
        assert!(validate_grid_size(8).is_ok());
        assert!(validate_grid_size(26).is_ok());
        assert!(validate_grid_size(0).is_err());
        assert!(validate_grid_size(27).is_err());
    }

    #[test]
    fn test_validate_field_polygon() {
        let square = vec![
            point(205939, 789624),
            point(205939, 789637),
            point(205931, 789637),
            point(205931, 789624),
        ];
        assert!(validate_field_polygon(&square).is_ok());
        assert!(validate_field_polygon(&square[..2]).is_err());
        assert!(validate_field_polygon(&[]).is_err());

        let mut bad = square.clone();
        bad.push(GeoPoint::new(Decimal::from(95), Decimal::ZERO));
        assert!(validate_field_polygon(&bad).is_err());
    }

    #[test]
    fn test_validate_zone_id() {
        assert!(validate_zone_id("A1", 8).is_ok());
        assert!(validate_zone_id("H8", 8).is_ok());
        assert!(validate_zone_id("H9", 8).is_err());
        assert!(validate_zone_id("a1", 8).is_err());
    }

    #[test]
    fn test_validate_unit_reading() {
        assert!(validate_unit_reading(0.0).is_ok());
        assert!(validate_unit_reading(1.0).is_ok());
        assert!(validate_unit_reading(0.42).is_ok());
        assert!(validate_unit_reading(-0.1).is_err());
        assert!(validate_unit_reading(1.1).is_err());
        assert!(validate_unit_reading(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_reading_window() {
        assert!(validate_reading_window(&[0.1; 10]).is_ok());
        assert!(validate_reading_window(&vec![0.1; MAX_WINDOW_READINGS + 1]).is_err());
    }
}
