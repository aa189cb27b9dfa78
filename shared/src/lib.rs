//! Shared types for the Entrada ticketing platform
//!
//! Wire models exchanged with the ticketing backend (events, venue layout
//! elements, price tiers, occupancy) and the unified API response envelope.

pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Area, AreaCreate, AreaUpdate, EnclosingShape, Event, EventLayoutUpdate, OccupiedSet,
    PriceTier, Seat, SeatCreate, Stage, VenueLayout, VenueTable, VenueTableCreate,
};
pub use response::{ApiResponse, API_CODE_SUCCESS};
