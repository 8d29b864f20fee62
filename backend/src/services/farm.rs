//! Farm record store: registration, seeding, grid ingestion and variance history

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::{
    parse_zone_id_in_grid, score_readings, summarize, validate_reading_window,
    validate_unit_reading, BoundingBox, Cell, FarmProfile, FarmRecord, FieldBoundary, Grid,
    GridSummary, RegisterFarmInput, RiskAssessment, RiskLabel, VarianceHistory, VarianceRecord,
};

use crate::error::{AppError, AppResult};

/// Farm service over the `farms` table
#[derive(Clone)]
pub struct FarmService {
    db: PgPool,
}

/// Row shape of the `farms` table
#[derive(Debug, sqlx::FromRow)]
struct FarmRow {
    id: Uuid,
    profile: Json<FarmProfile>,
    field: Json<FieldBoundary>,
    grid: Json<Grid>,
    variance: Json<VarianceRecord>,
}

impl From<FarmRow> for FarmRecord {
    fn from(row: FarmRow) -> Self {
        FarmRecord {
            id: row.id,
            profile: row.profile.0,
            field: row.field.0,
            grid: row.grid.0,
            variance: row.variance.0,
        }
    }
}

/// One zone's readings in a grid upload
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ZoneReading {
    pub ndvi: f64,
    pub moisture: f64,
}

/// Input for replacing a farm's grid with real readings
#[derive(Debug, Deserialize)]
pub struct ReplaceGridInput {
    pub zones: BTreeMap<String, ZoneReading>,
}

/// Input for scoring a sensor window against a farm
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceInput {
    pub readings: Vec<f64>,
    #[serde(default)]
    pub previous_window: Option<Vec<f64>>,
}

/// Result of scoring a window for a farm
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedVariance {
    pub assessment: RiskAssessment,
    /// False when the window was too small to score and nothing was stored
    pub recorded: bool,
    pub history: VarianceHistory,
}

/// Dashboard view of one farm
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmSummary {
    pub farmer_name: String,
    #[serde(flatten)]
    pub summary: GridSummary,
}

/// One zone as shown in the detail panel
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDetail {
    pub zone_id: String,
    pub risk_label: RiskLabel,
    #[serde(flatten)]
    pub cell: Cell,
    /// True when the zone has no stored readings
    pub placeholder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Fallback greeting when the farm profile is unavailable
pub const DEFAULT_FARMER_NAME: &str = "Farmer";

impl FarmSummary {
    /// Summary shown when the store cannot be read
    pub fn unavailable() -> Self {
        Self {
            farmer_name: DEFAULT_FARMER_NAME.to_string(),
            summary: GridSummary::default(),
        }
    }
}

impl FarmService {
    /// Create a new FarmService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a farm; `default_grid_size` applies when the input has none
    pub async fn register(
        &self,
        input: RegisterFarmInput,
        default_grid_size: u8,
    ) -> AppResult<FarmRecord> {
        input.validate()?;
        if let Some(point) = input.polygon.iter().find(|p| !p.is_valid()) {
            return Err(AppError::invalid(
                "polygon",
                format!("Coordinate {}, {} is out of range", point.lat, point.lng),
            ));
        }

        let mut record = FarmRecord::register(&input, Utc::now());
        if input.grid_size.is_none() {
            record.grid = Grid::empty(default_grid_size);
        }

        sqlx::query(
            r#"
            INSERT INTO farms (id, profile, field, grid, variance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(record.id)
        .bind(Json(&record.profile))
        .bind(Json(&record.field))
        .bind(Json(&record.grid))
        .bind(Json(&record.variance))
        .bind(record.profile.created_at)
        .execute(&self.db)
        .await?;

        tracing::info!(farm_id = %record.id, grid_size = record.grid.size, "Farm registered");

        Ok(record)
    }

    /// Get a farm record by ID
    pub async fn get_farm(&self, farm_id: Uuid) -> AppResult<FarmRecord> {
        let row = sqlx::query_as::<_, FarmRow>(
            r#"
            SELECT id, profile, field, grid, variance
            FROM farms
            WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))?;

        Ok(row.into())
    }

    /// Dashboard summary for a farm
    pub async fn summary(&self, farm_id: Uuid) -> AppResult<FarmSummary> {
        let farm = self.get_farm(farm_id).await?;
        let history = farm.variance.history.as_slice();
        let farmer_name = match farm.profile.farmer_name.trim() {
            "" => DEFAULT_FARMER_NAME.to_string(),
            name => name.to_string(),
        };

        Ok(FarmSummary {
            farmer_name,
            summary: summarize(Some(&farm.grid), (!history.is_empty()).then_some(history)),
        })
    }

    /// Replace the grid and history with a deterministic synthetic snapshot
    pub async fn seed_farm(&self, farm_id: Uuid, grid_size: Option<u8>) -> AppResult<FarmRecord> {
        let mut farm = self.get_farm(farm_id).await?;
        let size = grid_size.unwrap_or(farm.grid.size);

        let seeded = shared::seed(&farm_id.to_string(), size)?;
        let now = Utc::now();

        farm.grid = seeded.grid;
        farm.grid.touch(now);
        farm.variance = VarianceRecord {
            history: seeded.history,
            updated_at: Some(now),
        };

        self.write_snapshot(farm_id, &farm.grid, &farm.variance, now)
            .await?;

        tracing::info!(
            farm_id = %farm_id,
            grid_size = size,
            dry_row = seeded.anomalies.dry_row,
            weak_row = seeded.anomalies.weak_row,
            weak_col = seeded.anomalies.weak_col,
            "Farm seeded"
        );

        Ok(farm)
    }

    /// Replace the grid wholesale with uploaded readings
    pub async fn replace_grid(&self, farm_id: Uuid, input: ReplaceGridInput) -> AppResult<Grid> {
        let farm = self.get_farm(farm_id).await?;
        let now = Utc::now();
        let grid = build_grid(farm.grid.size, &input, now)?;

        let result = sqlx::query(
            r#"
            UPDATE farms
            SET grid = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .bind(Json(&grid))
        .bind(now)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Farm".to_string()));
        }

        tracing::debug!(farm_id = %farm_id, zones = grid.cells.len(), "Grid replaced");

        Ok(grid)
    }

    /// Score a sensor window and append the score to the farm's history
    pub async fn record_variance(
        &self,
        farm_id: Uuid,
        input: VarianceInput,
    ) -> AppResult<RecordedVariance> {
        validate_reading_window(&input.readings)
            .map_err(|msg| AppError::invalid("readings", msg))?;
        if let Some(previous) = &input.previous_window {
            validate_reading_window(previous)
                .map_err(|msg| AppError::invalid("previous_window", msg))?;
        }

        let assessment = score_readings(&input.readings, input.previous_window.as_deref());

        let mut tx = self.db.begin().await?;

        let variance = sqlx::query_scalar::<_, Json<VarianceRecord>>(
            r#"
            SELECT variance
            FROM farms
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(farm_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))?;

        let mut variance = variance.0;

        // An unscorable window says nothing about the field; keep it out of history
        if assessment.is_insufficient() {
            tx.rollback().await?;
            return Ok(RecordedVariance {
                assessment,
                recorded: false,
                history: variance.history,
            });
        }

        let now = Utc::now();
        variance.history.push(assessment.score);
        variance.updated_at = Some(now);

        sqlx::query(
            r#"
            UPDATE farms
            SET variance = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .bind(Json(&variance))
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            farm_id = %farm_id,
            score = assessment.score,
            days = variance.history.len(),
            "Variance score recorded"
        );

        Ok(RecordedVariance {
            assessment,
            recorded: true,
            history: variance.history,
        })
    }

    async fn write_snapshot(
        &self,
        farm_id: Uuid,
        grid: &Grid,
        variance: &VarianceRecord,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE farms
            SET grid = $2, variance = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .bind(Json(grid))
        .bind(Json(variance))
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Farm".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Detail of one zone of a farm, without an explanation.
///
/// Zones inside the grid but missing from it get a green placeholder.
pub fn zone_detail(farm: &FarmRecord, zone_id: &str) -> AppResult<ZoneDetail> {
    let size = farm.grid.size;
    let (row, col) = parse_zone_id_in_grid(zone_id, size)?;

    let (cell, placeholder) = match farm.grid.cells.get(zone_id) {
        Some(cell) => (cell.clone(), false),
        None => (Cell::placeholder(zone_id), true),
    };

    let bounds = BoundingBox::from_polygon(&farm.field.polygon)
        .map(|field| field.zone_bounds(size, row, col));

    Ok(ZoneDetail {
        zone_id: zone_id.to_string(),
        risk_label: cell.level.risk_label(),
        cell,
        placeholder,
        bounds,
        explanation: None,
    })
}

/// Build a grid of `size` from uploaded readings, rejecting zones outside it
pub fn build_grid(size: u8, input: &ReplaceGridInput, now: DateTime<Utc>) -> AppResult<Grid> {
    let mut grid = Grid::empty(size);

    for (zone_id, reading) in &input.zones {
        parse_zone_id_in_grid(zone_id, size)?;
        validate_unit_reading(reading.ndvi)
            .map_err(|msg| AppError::invalid("ndvi", format!("{}: {}", zone_id, msg)))?;
        validate_unit_reading(reading.moisture)
            .map_err(|msg| AppError::invalid("moisture", format!("{}: {}", zone_id, msg)))?;

        grid.cells.insert(
            zone_id.clone(),
            Cell::from_readings(reading.ndvi, reading.moisture),
        );
    }

    grid.recompute_averages();
    grid.touch(now);
    Ok(grid)
}
