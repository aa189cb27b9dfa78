//! In-memory layout entities
//!
//! Working copies of the wire models, keyed by [`ElementId`] so that
//! unsaved elements can reference each other before the backend has seen
//! them.

use crate::geometry::{Point, Rect};

use super::ElementId;

/// What kind of element an [`ElementId`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Area,
    Table,
    Seat,
}

/// A named rectangular zone used for grouping and area-membership inference
#[derive(Debug, Clone)]
pub struct Area {
    pub id: ElementId,
    pub name: String,
    pub rect: Rect,
    pub color: String,
}

/// A table on the seating plan
#[derive(Debug, Clone)]
pub struct Table {
    pub id: ElementId,
    pub number: i32,
    pub rect: Rect,
    /// Capacity declared at creation; the live chair count may drift after
    /// manual edits
    pub chair_capacity: i32,
    pub price_tier_id: i64,
    /// Stored assignment takes precedence over containment inference
    pub area_id: Option<i64>,
}

/// A seat on the seating plan
///
/// `table_id` set means chair; unset means individual seat.
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: ElementId,
    pub label: String,
    pub pos: Point,
    pub price_tier_id: i64,
    pub table_id: Option<ElementId>,
    pub area_id: Option<i64>,
}

impl Seat {
    pub fn is_chair(&self) -> bool {
        self.table_id.is_some()
    }
}
