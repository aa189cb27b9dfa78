//! Venue Table Model

use serde::{Deserialize, Serialize};

/// Table entity in world coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueTable {
    pub id: i64,
    pub event_id: i64,
    /// Display number, unique per event, assigned sequentially
    pub number: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Declared capacity at creation; descriptive, not enforced against
    /// the live chair count after manual edits
    pub chair_capacity: i32,
    pub price_tier_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<i64>,
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueTableCreate {
    pub event_id: i64,
    pub number: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub chair_capacity: i32,
    pub price_tier_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<i64>,
}
