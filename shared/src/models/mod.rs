//! Data models
//!
//! Wire types shared between the storefront clients and the ticketing
//! backend. All backend IDs are `i64`; client-side temporary IDs never
//! appear on the wire.

pub mod area;
pub mod event;
pub mod layout;
pub mod occupancy;
pub mod price_tier;
pub mod seat;
pub mod table;

// Re-exports
pub use area::*;
pub use event::*;
pub use layout::*;
pub use occupancy::*;
pub use price_tier::*;
pub use seat::*;
pub use table::*;
