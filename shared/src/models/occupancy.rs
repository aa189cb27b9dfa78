//! Occupancy Model

use serde::{Deserialize, Serialize};

/// IDs of elements already sold for an event
///
/// Returned by `GET /api/purchases/occupied/{event_id}` and consumed by the
/// customer-facing seat picker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupiedSet {
    #[serde(default)]
    pub table_ids: Vec<i64>,
    #[serde(default)]
    pub seat_ids: Vec<i64>,
}

impl OccupiedSet {
    pub fn contains_table(&self, id: i64) -> bool {
        self.table_ids.contains(&id)
    }

    pub fn contains_seat(&self, id: i64) -> bool {
        self.seat_ids.contains(&id)
    }
}
