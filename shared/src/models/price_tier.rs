//! Price Tier Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price tier referenced by tables and seats
///
/// Tier CRUD lives in the back office; layout code only reads tiers and
/// references them by ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTier {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Missing or duplicated colors are reassigned from the fixed palette
    /// on load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
