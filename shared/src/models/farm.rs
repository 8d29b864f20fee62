//! Farm record models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::dashboard::VarianceHistory;
use super::grid::{Grid, DEFAULT_GRID_SIZE};
use crate::types::GeoPoint;

/// Who farms the field and what is grown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmProfile {
    pub farmer_name: String,
    pub farm_name: String,
    pub crop_type: String,
    pub created_at: DateTime<Utc>,
}

/// Field boundary drawn at registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldBoundary {
    pub polygon: Vec<GeoPoint>,
    pub updated_at: DateTime<Utc>,
}

/// Stored variance score series
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VarianceRecord {
    #[serde(default)]
    pub history: VarianceHistory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The per-farm document; the farm is the unit of tenancy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    pub id: Uuid,
    pub profile: FarmProfile,
    pub field: FieldBoundary,
    pub grid: Grid,
    pub variance: VarianceRecord,
}

impl FarmRecord {
    /// New farm with an empty grid and no history
    pub fn register(input: &RegisterFarmInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: FarmProfile {
                farmer_name: input.farmer_name.trim().to_string(),
                farm_name: input.farm_name.trim().to_string(),
                crop_type: input.crop_type.trim().to_string(),
                created_at: now,
            },
            field: FieldBoundary {
                polygon: input.polygon.clone(),
                updated_at: now,
            },
            grid: Grid::empty(input.grid_size.unwrap_or(DEFAULT_GRID_SIZE)),
            variance: VarianceRecord::default(),
        }
    }
}

/// Input for registering a farm
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFarmInput {
    #[validate(custom = "not_blank")]
    pub farmer_name: String,
    #[validate(custom = "not_blank")]
    pub farm_name: String,
    #[validate(custom = "not_blank")]
    pub crop_type: String,
    #[validate(length(min = 3, message = "Field polygon needs at least 3 points"))]
    pub polygon: Vec<GeoPoint>,
    #[validate(range(min = 1, max = 26))]
    pub grid_size: Option<u8>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn input() -> RegisterFarmInput {
        RegisterFarmInput {
            farmer_name: "  Asha  ".to_string(),
            farm_name: "North Field".to_string(),
            crop_type: "cotton".to_string(),
            polygon: vec![
                GeoPoint::new(Decimal::new(205939, 4), Decimal::new(789624, 4)),
                GeoPoint::new(Decimal::new(205939, 4), Decimal::new(789637, 4)),
                GeoPoint::new(Decimal::new(205931, 4), Decimal::new(789637, 4)),
            ],
            grid_size: None,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_blank_names_rejected() {
        let mut bad = input();
        bad.farmer_name = "   ".to_string();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("farmer_name"));
    }

    #[test]
    fn test_short_polygon_rejected() {
        let mut bad = input();
        bad.polygon.truncate(2);
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("polygon"));
    }

    #[test]
    fn test_grid_size_range() {
        let mut bad = input();
        bad.grid_size = Some(27);
        assert!(bad.validate().is_err());
        bad.grid_size = Some(0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_register_defaults() {
        let now = Utc::now();
        let record = FarmRecord::register(&input(), now);
        assert_eq!(record.profile.farmer_name, "Asha");
        assert_eq!(record.grid.size, DEFAULT_GRID_SIZE);
        assert!(record.grid.cells.is_empty());
        assert!(record.variance.history.is_empty());
        assert_eq!(record.field.polygon.len(), 3);
    }
}
