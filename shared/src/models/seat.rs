//! Seat Model

use serde::{Deserialize, Serialize};

/// Seat entity in world coordinates
///
/// A seat with `table_id` set is a chair belonging to that table; without
/// one it is an individual seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub event_id: i64,
    /// `A{n}` for individual seats, plain integers for chairs
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub price_tier_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<i64>,
}

impl Seat {
    /// Whether this seat is a chair attached to a table
    pub fn is_chair(&self) -> bool {
        self.table_id.is_some()
    }
}

/// Create seat payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatCreate {
    pub event_id: i64,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub price_tier_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<i64>,
}
