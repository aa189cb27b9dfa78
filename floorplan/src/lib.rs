//! Floorplan - Venue Layout Engine
//!
//! The spatial core of the Entrada ticketing platform: world-space geometry,
//! the in-memory layout model (stage, areas, tables, seats), deterministic
//! auto-layout generators, the pointer-driven interaction engine for the
//! authoring surface, and the customer-facing seat picker with whole-table
//! bundling.
//!
//! Everything here is pure and synchronous; persistence lives in
//! `entrada-client`.

pub mod booking;
pub mod editor;
pub mod error;
pub mod generators;
pub mod geometry;
pub mod model;
pub mod money;
pub mod palette;

pub use booking::{BookingError, ElementState, LineItem, LineItemKind, SeatPicker};
pub use editor::{BlockedReason, Editor, EditorResponse, ElementInfo, PointerInput, Tool};
pub use error::{LayoutError, LayoutResult};
pub use geometry::{Point, Rect, Viewport, point_in_circle};
pub use model::{Area, ElementId, ElementKind, LayoutModel, Seat, Table};
