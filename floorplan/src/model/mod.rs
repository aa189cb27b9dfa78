//! Layout model
//!
//! The in-memory authoritative state of one event's seating plan: stage,
//! areas, tables, seats and the price tiers they reference. All mutation
//! goes through methods that preserve the invariants (chair cascade on
//! table delete, tier inheritance on bulk assign, computed area
//! membership); the `table → chairs` index is rebuilt after every mutation
//! instead of being maintained by hand at call sites.

mod entities;
mod id;

pub use entities::{Area, ElementKind, Seat, Table};
pub use id::ElementId;

use std::collections::HashMap;

use shared::models::{EnclosingShape, PriceTier, VenueLayout};
use tracing::debug;

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{CHAIR_HIT_RADIUS, Point, Rect, SEAT_HIT_RADIUS, point_in_circle};
use crate::palette;

/// In-memory seating plan for one event
#[derive(Debug, Clone, Default)]
pub struct LayoutModel {
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub shape: EnclosingShape,
    pub stage: Option<Rect>,
    areas: Vec<Area>,
    tables: Vec<Table>,
    seats: Vec<Seat>,
    price_tiers: Vec<PriceTier>,
    locked: bool,
    next_local: u64,
    chair_index: HashMap<ElementId, Vec<ElementId>>,
}

impl LayoutModel {
    /// Empty model with default sheet dimensions
    pub fn new() -> Self {
        Self {
            sheet_width: shared::models::DEFAULT_SHEET_WIDTH,
            sheet_height: shared::models::DEFAULT_SHEET_HEIGHT,
            ..Default::default()
        }
    }

    /// Rebuild the model from the backend's authoritative layout
    ///
    /// Replaces everything: switching events or reloading after save is a
    /// hard reset, never a merge. Tier colors are normalized on the way in.
    pub fn from_layout(layout: &VenueLayout) -> Self {
        let mut price_tiers = layout.price_tiers.clone();
        palette::ensure_tier_colors(&mut price_tiers);

        let mut model = Self {
            sheet_width: layout.event.sheet_width,
            sheet_height: layout.event.sheet_height,
            shape: layout.event.shape,
            stage: layout
                .event
                .stage
                .map(|s| Rect::new(s.x, s.y, s.width, s.height)),
            areas: layout
                .areas
                .iter()
                .map(|a| Area {
                    id: ElementId::Persisted(a.id),
                    name: a.name.clone(),
                    rect: Rect::new(a.x, a.y, a.width, a.height),
                    color: a.color.clone(),
                })
                .collect(),
            tables: layout
                .tables
                .iter()
                .map(|t| Table {
                    id: ElementId::Persisted(t.id),
                    number: t.number,
                    rect: Rect::new(t.x, t.y, t.width, t.height),
                    chair_capacity: t.chair_capacity,
                    price_tier_id: t.price_tier_id,
                    area_id: t.area_id,
                })
                .collect(),
            seats: layout
                .seats
                .iter()
                .map(|s| Seat {
                    id: ElementId::Persisted(s.id),
                    label: s.label.clone(),
                    pos: Point::new(s.x, s.y),
                    price_tier_id: s.price_tier_id,
                    table_id: s.table_id.map(ElementId::Persisted),
                    area_id: s.area_id,
                })
                .collect(),
            price_tiers,
            locked: layout.event.layout_locked,
            next_local: 0,
            chair_index: HashMap::new(),
        };
        model.rebuild_chair_index();
        model
    }

    // ========== Accessors ==========

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn price_tiers(&self) -> &[PriceTier] {
        &self.price_tiers
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Replace the tier list (after a back-office refresh), normalizing
    /// colors
    pub fn set_price_tiers(&mut self, mut tiers: Vec<PriceTier>) {
        palette::ensure_tier_colors(&mut tiers);
        self.price_tiers = tiers;
    }

    pub fn price_tier(&self, id: i64) -> Option<&PriceTier> {
        self.price_tiers.iter().find(|t| t.id == id)
    }

    pub fn area(&self, id: ElementId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn table(&self, id: ElementId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn seat(&self, id: ElementId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == id)
    }

    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        if self.table(id).is_some() {
            Some(ElementKind::Table)
        } else if self.seat(id).is_some() {
            Some(ElementKind::Seat)
        } else if self.area(id).is_some() {
            Some(ElementKind::Area)
        } else {
            None
        }
    }

    /// Chairs of a table, in insertion order
    pub fn chairs_of(&self, table_id: ElementId) -> &[ElementId] {
        self.chair_index
            .get(&table_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Seats with no owning table
    pub fn individual_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| !s.is_chair())
    }

    pub fn individual_seat_count(&self) -> usize {
        self.individual_seats().count()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    // ========== Mutations ==========

    fn alloc_id(&mut self) -> ElementId {
        self.next_local += 1;
        ElementId::Local(self.next_local)
    }

    fn require_tier(&self, tier_id: i64) -> LayoutResult<()> {
        if self.price_tier(tier_id).is_none() {
            return Err(LayoutError::UnknownPriceTier(tier_id));
        }
        Ok(())
    }

    /// Place or replace the stage rectangle (at most one per event)
    pub fn set_stage(&mut self, rect: Rect) {
        self.stage = Some(rect);
    }

    pub fn clear_stage(&mut self) {
        self.stage = None;
    }

    /// Add a named area; color is picked from the palette by creation order
    pub fn add_area(&mut self, rect: Rect, name: impl Into<String>) -> ElementId {
        let id = self.alloc_id();
        let color = palette::area_color(self.areas.len()).to_string();
        self.areas.push(Area {
            id,
            name: name.into(),
            rect,
            color,
        });
        id
    }

    /// Add a table without chairs; chair generation is the caller's job
    pub fn add_table(
        &mut self,
        rect: Rect,
        number: i32,
        chair_capacity: i32,
        price_tier_id: i64,
    ) -> LayoutResult<ElementId> {
        if chair_capacity < 1 {
            return Err(LayoutError::InvalidCapacity(chair_capacity));
        }
        self.require_tier(price_tier_id)?;
        let id = self.alloc_id();
        self.tables.push(Table {
            id,
            number,
            rect,
            chair_capacity,
            price_tier_id,
            area_id: None,
        });
        self.rebuild_chair_index();
        Ok(id)
    }

    /// Add a seat; pass `table_id` to attach it as a chair
    pub fn add_seat(
        &mut self,
        pos: Point,
        label: impl Into<String>,
        price_tier_id: i64,
        table_id: Option<ElementId>,
    ) -> LayoutResult<ElementId> {
        self.require_tier(price_tier_id)?;
        if let Some(tid) = table_id {
            if self.table(tid).is_none() {
                return Err(LayoutError::NotATable(tid));
            }
        }
        let id = self.alloc_id();
        self.seats.push(Seat {
            id,
            label: label.into(),
            pos,
            price_tier_id,
            table_id,
            area_id: None,
        });
        self.rebuild_chair_index();
        Ok(id)
    }

    /// Delete a table (cascading to its chairs), seat, or area
    ///
    /// Deleting an area leaves its contents in place; see
    /// [`delete_area_with_contents`](Self::delete_area_with_contents).
    pub fn delete(&mut self, id: ElementId) -> LayoutResult<()> {
        if self.tables.iter().any(|t| t.id == id) {
            let chairs = self.chairs_of(id).to_vec();
            debug!(table = %id, chairs = chairs.len(), "deleting table with chairs");
            self.tables.retain(|t| t.id != id);
            self.seats.retain(|s| s.id != id && s.table_id != Some(id));
            self.rebuild_chair_index();
            Ok(())
        } else if self.seats.iter().any(|s| s.id == id) {
            self.seats.retain(|s| s.id != id);
            self.rebuild_chair_index();
            Ok(())
        } else if self.areas.iter().any(|a| a.id == id) {
            self.areas.retain(|a| a.id != id);
            Ok(())
        } else {
            Err(LayoutError::UnknownElement(id))
        }
    }

    /// Delete an area together with every table and individual seat whose
    /// anchor lies inside it (tables cascade to their chairs)
    pub fn delete_area_with_contents(&mut self, id: ElementId) -> LayoutResult<()> {
        let rect = self
            .area(id)
            .map(|a| a.rect)
            .ok_or(LayoutError::UnknownElement(id))?;
        let doomed_tables: Vec<ElementId> = self
            .tables
            .iter()
            .filter(|t| rect.contains(t.rect.center()))
            .map(|t| t.id)
            .collect();
        let doomed_seats: Vec<ElementId> = self
            .seats
            .iter()
            .filter(|s| !s.is_chair() && rect.contains(s.pos))
            .map(|s| s.id)
            .collect();
        for tid in doomed_tables {
            self.delete(tid)?;
        }
        for sid in doomed_seats {
            self.delete(sid)?;
        }
        self.areas.retain(|a| a.id != id);
        Ok(())
    }

    /// Current anchor position of an element (table origin or seat center)
    pub fn position(&self, id: ElementId) -> Option<Point> {
        if let Some(t) = self.table(id) {
            Some(Point::new(t.rect.x, t.rect.y))
        } else {
            self.seat(id).map(|s| s.pos)
        }
    }

    /// Move an element to an absolute anchor position
    ///
    /// Moving a table does not move its chairs; group movement is composed
    /// by the interaction engine from per-element snapshots.
    pub fn set_position(&mut self, id: ElementId, pos: Point) -> LayoutResult<()> {
        if let Some(t) = self.tables.iter_mut().find(|t| t.id == id) {
            t.rect.x = pos.x;
            t.rect.y = pos.y;
            Ok(())
        } else if let Some(s) = self.seats.iter_mut().find(|s| s.id == id) {
            s.pos = pos;
            Ok(())
        } else {
            Err(LayoutError::UnknownElement(id))
        }
    }

    /// Assign a price tier to a selection of tables and seats
    ///
    /// Every selected table also reassigns all of its chairs: chairs
    /// inherit the table's tier on bulk assign.
    pub fn assign_price_tier(
        &mut self,
        selection: &[ElementId],
        tier_id: i64,
    ) -> LayoutResult<()> {
        self.require_tier(tier_id)?;
        for &id in selection {
            if self.tables.iter().any(|t| t.id == id) {
                let chairs = self.chairs_of(id).to_vec();
                if let Some(t) = self.tables.iter_mut().find(|t| t.id == id) {
                    t.price_tier_id = tier_id;
                }
                for chair in chairs {
                    if let Some(s) = self.seats.iter_mut().find(|s| s.id == chair) {
                        s.price_tier_id = tier_id;
                    }
                }
            } else if let Some(s) = self.seats.iter_mut().find(|s| s.id == id) {
                s.price_tier_id = tier_id;
            }
        }
        Ok(())
    }

    /// Renumber individual seats sequentially as `A{n}` starting at `start`
    ///
    /// Chairs keep their per-table labels untouched. Runs as step one of
    /// every save so labels are unique after persisting, without rejecting
    /// duplicates during editing.
    pub fn renumber_individual_seats(&mut self, start: usize) {
        let mut n = start;
        for seat in self.seats.iter_mut().filter(|s| s.table_id.is_none()) {
            seat.label = format!("A{n}");
            n += 1;
        }
        debug!(
            count = n - start,
            start, "renumbered individual seats"
        );
    }

    // ========== Queries ==========

    /// The area containing an anchor point, if any
    ///
    /// Overlapping areas resolve to the smallest surface; ties break on the
    /// lowest element ID, so the result never depends on insertion order.
    pub fn area_containing(&self, anchor: Point) -> Option<&Area> {
        self.areas
            .iter()
            .filter(|a| a.rect.contains(anchor))
            .min_by(|a, b| {
                a.rect
                    .surface()
                    .partial_cmp(&b.rect.surface())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.id.cmp(&b.id))
            })
    }

    /// Topmost table or seat under a pointer position
    ///
    /// Seats win over tables (they draw on top and are smaller targets);
    /// within a kind, later-created elements win.
    pub fn hit_test(&self, p: Point) -> Option<ElementId> {
        for seat in self.seats.iter().rev() {
            let radius = if seat.is_chair() {
                CHAIR_HIT_RADIUS
            } else {
                SEAT_HIT_RADIUS
            };
            if point_in_circle(p, seat.pos, radius) {
                return Some(seat.id);
            }
        }
        for table in self.tables.iter().rev() {
            if table.rect.contains(p) {
                return Some(table.id);
            }
        }
        None
    }

    /// Tables and seats whose center point falls inside a marquee rectangle
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        let mut out = Vec::new();
        for table in &self.tables {
            if rect.contains(table.rect.center()) {
                out.push(table.id);
            }
        }
        for seat in &self.seats {
            if rect.contains(seat.pos) {
                out.push(seat.id);
            }
        }
        out
    }

    fn rebuild_chair_index(&mut self) {
        self.chair_index.clear();
        for seat in &self.seats {
            if let Some(tid) = seat.table_id {
                self.chair_index.entry(tid).or_default().push(seat.id);
            }
        }
    }
}
