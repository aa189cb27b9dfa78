//! Venue Layout Aggregate

use serde::{Deserialize, Serialize};

use super::{Area, Event, PriceTier, Seat, VenueTable};

/// The complete persisted layout of one event
///
/// Assembled by the client from the per-collection endpoints; the authoring
/// side rebuilds its in-memory model from this after every save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueLayout {
    pub event: Event,
    pub areas: Vec<Area>,
    pub tables: Vec<VenueTable>,
    pub seats: Vec<Seat>,
    pub price_tiers: Vec<PriceTier>,
}

impl VenueLayout {
    /// Chairs of one table, in stored order
    pub fn chairs_of(&self, table_id: i64) -> impl Iterator<Item = &Seat> {
        self.seats
            .iter()
            .filter(move |s| s.table_id == Some(table_id))
    }

    /// Individual seats (no owning table)
    pub fn individual_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.table_id.is_none())
    }

    pub fn table(&self, id: i64) -> Option<&VenueTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn seat(&self, id: i64) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == id)
    }

    pub fn price_tier(&self, id: i64) -> Option<&PriceTier> {
        self.price_tiers.iter().find(|t| t.id == id)
    }
}
