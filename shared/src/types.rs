//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point on the field boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: Decimal,
    pub lng: Decimal,
}

impl GeoPoint {
    pub fn new(lat: Decimal, lng: Decimal) -> Self {
        Self { lat, lng }
    }

    /// Whether the point is a valid WGS84 coordinate
    pub fn is_valid(&self) -> bool {
        self.lat >= Decimal::from(-90)
            && self.lat <= Decimal::from(90)
            && self.lng >= Decimal::from(-180)
            && self.lng <= Decimal::from(180)
    }
}

/// Axis-aligned bounds of a field polygon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min_lat: Decimal,
    pub max_lat: Decimal,
    pub min_lng: Decimal,
    pub max_lng: Decimal,
}

impl BoundingBox {
    /// Bounds of a polygon; `None` for an empty polygon
    pub fn from_polygon(polygon: &[GeoPoint]) -> Option<Self> {
        let first = polygon.first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        Some(polygon.iter().skip(1).fold(init, |acc, p| Self {
            min_lat: acc.min_lat.min(p.lat),
            max_lat: acc.max_lat.max(p.lat),
            min_lng: acc.min_lng.min(p.lng),
            max_lng: acc.max_lng.max(p.lng),
        }))
    }

    pub fn center(&self) -> GeoPoint {
        let two = Decimal::from(2);
        GeoPoint::new(
            (self.min_lat + self.max_lat) / two,
            (self.min_lng + self.max_lng) / two,
        )
    }

    /// Bounds of the grid zone at (`row`, `col`) when the box is split into `size`×`size` zones.
    /// Rows run south to north, columns west to east.
    pub fn zone_bounds(&self, size: u8, row: u8, col: u8) -> Self {
        let n = Decimal::from(size.max(1));
        let lat_step = (self.max_lat - self.min_lat) / n;
        let lng_step = (self.max_lng - self.min_lng) / n;
        Self {
            min_lat: self.min_lat + Decimal::from(row) * lat_step,
            max_lat: self.min_lat + Decimal::from(row + 1) * lat_step,
            min_lng: self.min_lng + Decimal::from(col) * lng_step,
            max_lng: self.min_lng + Decimal::from(col + 1) * lng_step,
        }
    }
}
