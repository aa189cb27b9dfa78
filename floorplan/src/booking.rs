//! Occupancy renderer & selection bundler
//!
//! The customer-facing side of the layout: classify every element as
//! available, selected, or occupied, and aggregate the customer's clicks
//! into priced line items. Selecting a table with all chairs free bundles
//! them into one synthetic "whole table" item priced as the sum of its
//! chairs' tiers; a chair inside an active bundle is never counted twice.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use shared::models::{OccupiedSet, VenueLayout};

use crate::money::round_money;
use crate::palette;

/// Rejected clicks, surfaced to the customer as warnings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("table {0} is already occupied")]
    TableOccupied(i64),

    #[error("seat {0} is already occupied")]
    SeatOccupied(i64),

    #[error("unknown table: {0}")]
    UnknownTable(i64),

    #[error("unknown seat: {0}")]
    UnknownSeat(i64),
}

/// Render state of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Tier color
    Available,
    /// Gold outline
    Selected,
    /// Red fill with strikethrough glyph
    Occupied,
}

impl ElementState {
    /// Fill color for this state, given the element's tier color
    pub fn fill<'a>(&self, tier_color: &'a str) -> &'a str {
        match self {
            Self::Occupied => palette::OCCUPIED_FILL,
            _ => tier_color,
        }
    }

    /// Outline color, present only while selected
    pub fn outline(&self) -> Option<&'static str> {
        matches!(self, Self::Selected).then_some(palette::SELECTED_OUTLINE)
    }
}

/// What the customer is paying for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemKind {
    /// One individually selected seat or chair
    Seat { seat_id: i64 },
    /// All chairs of one table, sold together
    TableBundle { table_id: i64 },
}

/// One priced entry in the customer's basket
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub kind: LineItemKind,
    pub label: String,
    pub price: Decimal,
}

/// Render states for every element, keyed by backend ID
#[derive(Debug, Clone, Default)]
pub struct ElementStates {
    pub tables: HashMap<i64, ElementState>,
    pub seats: HashMap<i64, ElementState>,
}

/// Customer seat selection over a read-only layout
#[derive(Debug, Clone)]
pub struct SeatPicker {
    layout: VenueLayout,
    occupied: OccupiedSet,
    selected_seats: BTreeSet<i64>,
    /// Tables with an active whole-table bundle
    bundled_tables: BTreeSet<i64>,
}

impl SeatPicker {
    /// Build a picker over the authoritative layout and occupancy set
    ///
    /// Tier colors are normalized so every tier renders distinctly.
    pub fn new(mut layout: VenueLayout, occupied: OccupiedSet) -> Self {
        palette::ensure_tier_colors(&mut layout.price_tiers);
        Self {
            layout,
            occupied,
            selected_seats: BTreeSet::new(),
            bundled_tables: BTreeSet::new(),
        }
    }

    pub fn layout(&self) -> &VenueLayout {
        &self.layout
    }

    // ========== Render states ==========

    pub fn seat_state(&self, seat_id: i64) -> ElementState {
        if self.is_seat_occupied(seat_id) {
            ElementState::Occupied
        } else if self.selected_seats.contains(&seat_id) {
            ElementState::Selected
        } else {
            ElementState::Available
        }
    }

    pub fn table_state(&self, table_id: i64) -> ElementState {
        if self.is_table_occupied(table_id) {
            ElementState::Occupied
        } else if self.bundled_tables.contains(&table_id) {
            ElementState::Selected
        } else {
            ElementState::Available
        }
    }

    /// States for every table and seat in one pass, for rendering
    pub fn element_states(&self) -> ElementStates {
        let mut states = ElementStates::default();
        for table in &self.layout.tables {
            states.tables.insert(table.id, self.table_state(table.id));
        }
        for seat in &self.layout.seats {
            states.seats.insert(seat.id, self.seat_state(seat.id));
        }
        states
    }

    // ========== Click handling ==========

    /// Toggle the whole-table bundle for a table
    ///
    /// With every chair free and none selected, selects them all and adds
    /// the bundle; with all chairs already selected, removes everything.
    /// A partially selected table completes the bundle.
    pub fn click_table(&mut self, table_id: i64) -> Result<(), BookingError> {
        if self.layout.table(table_id).is_none() {
            return Err(BookingError::UnknownTable(table_id));
        }
        if self.is_table_occupied(table_id) {
            return Err(BookingError::TableOccupied(table_id));
        }
        let chairs: Vec<i64> = self.layout.chairs_of(table_id).map(|s| s.id).collect();
        if chairs.is_empty() {
            // nothing sellable on a chairless table
            return Ok(());
        }

        if chairs.iter().all(|id| self.selected_seats.contains(id)) {
            for id in &chairs {
                self.selected_seats.remove(id);
            }
            self.bundled_tables.remove(&table_id);
            debug!(table_id, "whole-table bundle removed");
        } else {
            self.selected_seats.extend(chairs.iter().copied());
            self.bundled_tables.insert(table_id);
            debug!(table_id, chairs = chairs.len(), "whole-table bundle added");
        }
        Ok(())
    }

    /// Toggle one seat or chair
    ///
    /// Deselecting a chair whose table has an active bundle drops the
    /// bundle; the table's other chairs stay individually selected.
    pub fn click_seat(&mut self, seat_id: i64) -> Result<(), BookingError> {
        let seat = self
            .layout
            .seat(seat_id)
            .ok_or(BookingError::UnknownSeat(seat_id))?;
        if self.is_seat_occupied(seat_id) {
            return Err(BookingError::SeatOccupied(seat_id));
        }
        let table_id = seat.table_id;

        if self.selected_seats.remove(&seat_id) {
            if let Some(tid) = table_id {
                if self.bundled_tables.remove(&tid) {
                    debug!(table_id = tid, seat_id, "bundle broken by chair deselect");
                }
            }
        } else {
            self.selected_seats.insert(seat_id);
        }
        Ok(())
    }

    // ========== Pricing ==========

    /// Priced basket: bundles first, then individually counted seats
    pub fn line_items(&self) -> Vec<LineItem> {
        let mut items = Vec::new();
        for &table_id in &self.bundled_tables {
            let number = self
                .layout
                .table(table_id)
                .map(|t| t.number)
                .unwrap_or_default();
            items.push(LineItem {
                kind: LineItemKind::TableBundle { table_id },
                label: format!("Table {number} (whole)"),
                price: self.bundle_price(table_id),
            });
        }
        for &seat_id in &self.selected_seats {
            if self.covered_by_bundle(seat_id) {
                continue;
            }
            let Some(seat) = self.layout.seat(seat_id) else {
                continue;
            };
            items.push(LineItem {
                kind: LineItemKind::Seat { seat_id },
                label: format!("Seat {}", seat.label),
                price: self.seat_price(seat_id),
            });
        }
        items
    }

    /// Basket total, rounded to cents
    pub fn total(&self) -> Decimal {
        round_money(self.line_items().iter().map(|i| i.price).sum())
    }

    pub fn selected_seat_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.selected_seats.iter().copied()
    }

    pub fn bundled_table_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.bundled_tables.iter().copied()
    }

    // ========== Internals ==========

    fn is_table_occupied(&self, table_id: i64) -> bool {
        self.occupied.contains_table(table_id)
            || self
                .layout
                .chairs_of(table_id)
                .any(|s| self.occupied.contains_seat(s.id))
    }

    fn is_seat_occupied(&self, seat_id: i64) -> bool {
        self.occupied.contains_seat(seat_id)
            || self
                .layout
                .seat(seat_id)
                .and_then(|s| s.table_id)
                .is_some_and(|tid| self.occupied.contains_table(tid))
    }

    fn covered_by_bundle(&self, seat_id: i64) -> bool {
        self.layout
            .seat(seat_id)
            .and_then(|s| s.table_id)
            .is_some_and(|tid| self.bundled_tables.contains(&tid))
    }

    fn seat_price(&self, seat_id: i64) -> Decimal {
        self.layout
            .seat(seat_id)
            .and_then(|s| self.layout.price_tier(s.price_tier_id))
            .map(|t| t.price)
            .unwrap_or(Decimal::ZERO)
    }

    fn bundle_price(&self, table_id: i64) -> Decimal {
        self.layout
            .chairs_of(table_id)
            .map(|s| self.seat_price(s.id))
            .sum()
    }
}
