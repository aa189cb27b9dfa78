//! Event Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decorative shape enclosing the seating plan
///
/// Drawn inside the sheet; carries no collision meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnclosingShape {
    #[default]
    Rectangle,
    Square,
    Triangle,
    Circle,
}

/// Stage rectangle in world coordinates (at most one per event)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Event entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    /// Special events carry a custom seating plan
    pub is_special: bool,
    pub shape: EnclosingShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub layout_locked: bool,
}

/// Update payload for the event's scalar layout fields
///
/// Sent as one `PUT /api/events/{id}` call during save; `None` fields are
/// left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLayoutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<EnclosingShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_locked: Option<bool>,
}

/// Default sheet extent when an event has never stored one
pub const DEFAULT_SHEET_WIDTH: f64 = 1000.0;
pub const DEFAULT_SHEET_HEIGHT: f64 = 600.0;
