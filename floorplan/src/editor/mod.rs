//! Interaction engine
//!
//! Pointer-driven authoring on top of the layout model. The engine is
//! UI-free: pointer handlers return an [`EditorResponse`] telling the
//! embedding surface what follow-up it owes (area-name prompt, delete
//! confirmation, inspection payload, blocked reason); prompts resolve
//! through explicit `commit_*`/`confirm_*` calls.

use tracing::debug;

use crate::generators;
use crate::geometry::{Point, Rect};
use crate::model::{ElementId, ElementKind, LayoutModel};

/// Minimum committed size for drawn rectangles
const MIN_DRAW_SIZE: f64 = 10.0;

/// Authoring tool, one active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Draw the stage rectangle
    Stage,
    /// Draw a named area
    Area,
    /// Select, drag, marquee
    #[default]
    Select,
    /// Place one individual seat per click
    Seat,
    /// Place one table with auto-generated chairs per click
    Tables,
    /// Place one bare table per click (chairs added manually)
    TableSingle,
    /// Draw a zone and fill it with grid seats
    ZoneSeats,
    /// Draw a zone and fill it with a grid of chaired tables
    ZoneTables,
}

impl Tool {
    fn draws_rect(self) -> bool {
        matches!(self, Self::Stage | Self::Area | Self::ZoneSeats | Self::ZoneTables)
    }

    fn places_point(self) -> bool {
        matches!(self, Self::Seat | Self::Tables | Self::TableSingle)
    }
}

/// One pointer event in world coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    pub pos: Point,
    /// Shift held: additive selection
    pub shift: bool,
    /// Secondary button: delete request
    pub secondary: bool,
}

/// Why an action did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedReason {
    /// Layout is locked after a save; unlock to edit
    LayoutLocked,
    /// Placement and zone tools need a pre-selected price tier
    MissingPriceTier,
    /// Table tools need a chair capacity of at least 1
    MissingCapacity,
    /// Drawn rectangle under the 10×10 minimum
    RectTooSmall,
    /// A prompt (area name / delete confirmation) is still open
    PromptPending,
}

/// Read-only metadata shown when inspecting a locked layout
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    pub id: ElementId,
    pub kind: ElementKind,
    pub label: String,
    pub position: Point,
    pub price_tier: Option<String>,
    pub area: Option<String>,
    /// Owning table number, for chairs
    pub table_number: Option<i32>,
}

/// What the embedding UI owes after a pointer or command call
#[derive(Debug, Clone, PartialEq)]
pub enum EditorResponse {
    None,
    /// Stage rectangle committed
    StageSet(Rect),
    /// One element created
    Created(ElementId),
    /// A generator ran
    Generated(Vec<ElementId>),
    /// An element (and cascade) was deleted
    Deleted(ElementId),
    /// Selection changed; re-render highlights
    SelectionChanged,
    /// Ask the operator for the drawn area's name, then call
    /// [`Editor::commit_area_name`] or [`Editor::cancel_prompt`]
    AreaNamePrompt(Rect),
    /// Ask for delete confirmation, then call
    /// [`Editor::confirm_delete`] or [`Editor::cancel_prompt`]
    ConfirmDelete(ElementId),
    /// Locked-layout inspection payload
    Inspect(ElementInfo),
    /// Action refused locally
    Blocked(BlockedReason),
}

/// An in-flight pointer gesture
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Rubber-band rectangle for the draw tools
    Draw { anchor: Point, current: Point },
    /// Marquee selection rectangle
    Marquee {
        anchor: Point,
        current: Point,
        additive: bool,
    },
    /// Group drag; every moving element's original position is
    /// snapshotted at drag start and re-derived from the total pointer
    /// delta on every move, never from compounded increments
    Drag {
        start: Point,
        snapshot: Vec<(ElementId, Point)>,
    },
}

/// A prompt waiting on the operator
#[derive(Debug, Clone)]
enum Pending {
    AreaName { rect: Rect },
    Delete { target: ElementId },
}

/// Pointer-driven editor over one [`LayoutModel`]
#[derive(Debug, Default)]
pub struct Editor {
    tool: Tool,
    /// Tier applied to newly placed elements
    active_tier: Option<i64>,
    /// Capacity for the table tools and zone-table generation
    chair_capacity: i32,
    /// Seat count for zone-seat generation
    zone_seat_count: usize,
    /// Table count for zone-table generation
    zone_table_count: usize,
    selection: Vec<ElementId>,
    gesture: Gesture,
    pending: Option<Pending>,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            chair_capacity: 4,
            zone_seat_count: 16,
            zone_table_count: 4,
            ..Default::default()
        }
    }

    // ========== Tool and parameter state ==========

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, dropping any in-flight gesture; leaving select mode
    /// clears the selection
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == Tool::Select && tool != Tool::Select {
            self.selection.clear();
        }
        self.tool = tool;
        self.gesture = Gesture::Idle;
    }

    pub fn set_active_tier(&mut self, tier: Option<i64>) {
        self.active_tier = tier;
    }

    pub fn set_chair_capacity(&mut self, capacity: i32) {
        self.chair_capacity = capacity;
    }

    pub fn set_zone_seat_count(&mut self, count: usize) {
        self.zone_seat_count = count;
    }

    pub fn set_zone_table_count(&mut self, count: usize) {
        self.zone_table_count = count;
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Live rubber-band rectangle, for rendering the draw/marquee overlay
    pub fn active_rect(&self) -> Option<Rect> {
        match self.gesture {
            Gesture::Draw { anchor, current } | Gesture::Marquee { anchor, current, .. } => {
                Some(Rect::from_corners(anchor, current))
            }
            _ => None,
        }
    }

    /// Clear the selection and drop any gesture; always allowed
    pub fn escape(&mut self) {
        self.selection.clear();
        self.gesture = Gesture::Idle;
    }

    // ========== Pointer handlers ==========

    pub fn pointer_down(&mut self, model: &mut LayoutModel, input: PointerInput) -> EditorResponse {
        if self.pending.is_some() {
            return EditorResponse::Blocked(BlockedReason::PromptPending);
        }

        if input.secondary {
            return self.request_delete(model, input.pos);
        }

        if model.locked() {
            return self.inspect_or_block(model, input.pos);
        }

        if self.tool.draws_rect() {
            if matches!(self.tool, Tool::ZoneSeats | Tool::ZoneTables) && self.active_tier.is_none()
            {
                return EditorResponse::Blocked(BlockedReason::MissingPriceTier);
            }
            self.gesture = Gesture::Draw {
                anchor: input.pos,
                current: input.pos,
            };
            return EditorResponse::None;
        }

        if self.tool.places_point() {
            return self.place_at(model, input.pos);
        }

        // select tool
        match model.hit_test(input.pos) {
            Some(id) => {
                if input.shift {
                    if let Some(i) = self.selection.iter().position(|&s| s == id) {
                        self.selection.remove(i);
                    } else {
                        self.selection.push(id);
                    }
                    EditorResponse::SelectionChanged
                } else {
                    if !self.selection.contains(&id) {
                        self.selection = vec![id];
                    }
                    self.begin_drag(model, input.pos);
                    EditorResponse::SelectionChanged
                }
            }
            None => {
                self.gesture = Gesture::Marquee {
                    anchor: input.pos,
                    current: input.pos,
                    additive: input.shift,
                };
                EditorResponse::None
            }
        }
    }

    pub fn pointer_move(&mut self, model: &mut LayoutModel, input: PointerInput) -> EditorResponse {
        match &mut self.gesture {
            Gesture::Draw { current, .. } | Gesture::Marquee { current, .. } => {
                *current = input.pos;
                EditorResponse::None
            }
            Gesture::Drag { start, snapshot } => {
                let dx = input.pos.x - start.x;
                let dy = input.pos.y - start.y;
                for (id, origin) in snapshot.clone() {
                    // element may have been deleted mid-drag by a cascade
                    let _ = model.set_position(id, origin.offset(dx, dy));
                }
                EditorResponse::None
            }
            Gesture::Idle => EditorResponse::None,
        }
    }

    pub fn pointer_up(&mut self, model: &mut LayoutModel, input: PointerInput) -> EditorResponse {
        match std::mem::take(&mut self.gesture) {
            Gesture::Draw { anchor, .. } => {
                let rect = Rect::from_corners(anchor, input.pos);
                if rect.width < MIN_DRAW_SIZE || rect.height < MIN_DRAW_SIZE {
                    return EditorResponse::Blocked(BlockedReason::RectTooSmall);
                }
                self.commit_rect(model, rect)
            }
            Gesture::Marquee { anchor, additive, .. } => {
                let rect = Rect::from_corners(anchor, input.pos);
                let captured = model.elements_in_rect(rect);
                if additive {
                    for id in captured {
                        if !self.selection.contains(&id) {
                            self.selection.push(id);
                        }
                    }
                } else {
                    self.selection = captured;
                }
                EditorResponse::SelectionChanged
            }
            Gesture::Drag { .. } | Gesture::Idle => EditorResponse::None,
        }
    }

    // ========== Prompt resolution ==========

    /// Commit the pending area rectangle under the given name
    ///
    /// A blank name keeps the prompt open; use
    /// [`cancel_prompt`](Self::cancel_prompt) to discard the rectangle.
    pub fn commit_area_name(
        &mut self,
        model: &mut LayoutModel,
        name: impl Into<String>,
    ) -> EditorResponse {
        let name = name.into();
        let Some(Pending::AreaName { rect }) = &self.pending else {
            return EditorResponse::None;
        };
        if name.trim().is_empty() {
            return EditorResponse::Blocked(BlockedReason::PromptPending);
        }
        let rect = *rect;
        self.pending = None;
        let id = model.add_area(rect, name.trim());
        EditorResponse::Created(id)
    }

    /// Perform the pending confirmed delete (cascading for tables)
    pub fn confirm_delete(&mut self, model: &mut LayoutModel) -> EditorResponse {
        let Some(Pending::Delete { target }) = self.pending.take() else {
            return EditorResponse::None;
        };
        let chairs: Vec<ElementId> = model.chairs_of(target).to_vec();
        if model.delete(target).is_err() {
            return EditorResponse::None;
        }
        self.selection
            .retain(|id| *id != target && !chairs.contains(id));
        debug!(element = %target, "deleted element");
        EditorResponse::Deleted(target)
    }

    /// Dismiss the open prompt, discarding its pending rectangle or target
    pub fn cancel_prompt(&mut self) {
        self.pending = None;
    }

    // ========== Internals ==========

    fn request_delete(&mut self, model: &LayoutModel, pos: Point) -> EditorResponse {
        if model.locked() {
            return EditorResponse::Blocked(BlockedReason::LayoutLocked);
        }
        match model.hit_test(pos) {
            Some(id) => {
                self.pending = Some(Pending::Delete { target: id });
                EditorResponse::ConfirmDelete(id)
            }
            None => EditorResponse::None,
        }
    }

    fn inspect_or_block(&self, model: &LayoutModel, pos: Point) -> EditorResponse {
        if self.tool != Tool::Select {
            return EditorResponse::Blocked(BlockedReason::LayoutLocked);
        }
        match model.hit_test(pos) {
            Some(id) => match self.element_info(model, id) {
                Some(info) => EditorResponse::Inspect(info),
                None => EditorResponse::None,
            },
            None => EditorResponse::None,
        }
    }

    fn element_info(&self, model: &LayoutModel, id: ElementId) -> Option<ElementInfo> {
        let tier_name = |tier_id: i64| {
            model
                .price_tier(tier_id)
                .map(|t| format!("{} ({})", t.name, t.price))
        };
        if let Some(table) = model.table(id) {
            let anchor = table.rect.center();
            Some(ElementInfo {
                id,
                kind: ElementKind::Table,
                label: format!("Table {}", table.number),
                position: Point::new(table.rect.x, table.rect.y),
                price_tier: tier_name(table.price_tier_id),
                area: model.area_containing(anchor).map(|a| a.name.clone()),
                table_number: Some(table.number),
            })
        } else if let Some(seat) = model.seat(id) {
            let table_number = seat
                .table_id
                .and_then(|tid| model.table(tid))
                .map(|t| t.number);
            Some(ElementInfo {
                id,
                kind: ElementKind::Seat,
                label: seat.label.clone(),
                position: seat.pos,
                price_tier: tier_name(seat.price_tier_id),
                area: model.area_containing(seat.pos).map(|a| a.name.clone()),
                table_number,
            })
        } else {
            None
        }
    }

    fn place_at(&mut self, model: &mut LayoutModel, pos: Point) -> EditorResponse {
        let Some(tier) = self.active_tier else {
            return EditorResponse::Blocked(BlockedReason::MissingPriceTier);
        };
        match self.tool {
            Tool::Seat => {
                let label = format!("A{}", model.individual_seat_count() + 1);
                match model.add_seat(pos, label, tier, None) {
                    Ok(id) => EditorResponse::Created(id),
                    Err(_) => EditorResponse::Blocked(BlockedReason::MissingPriceTier),
                }
            }
            Tool::Tables => {
                if self.chair_capacity < 1 {
                    return EditorResponse::Blocked(BlockedReason::MissingCapacity);
                }
                match generators::place_table(model, pos, self.chair_capacity, tier) {
                    Ok(id) => EditorResponse::Created(id),
                    Err(_) => EditorResponse::Blocked(BlockedReason::MissingCapacity),
                }
            }
            Tool::TableSingle => {
                if self.chair_capacity < 1 {
                    return EditorResponse::Blocked(BlockedReason::MissingCapacity);
                }
                let rect = Rect::new(
                    pos.x - generators::TABLE_SIZE / 2.0,
                    pos.y - generators::TABLE_SIZE / 2.0,
                    generators::TABLE_SIZE,
                    generators::TABLE_SIZE,
                );
                let number = model.table_count() as i32 + 1;
                match model.add_table(rect, number, self.chair_capacity, tier) {
                    Ok(id) => EditorResponse::Created(id),
                    Err(_) => EditorResponse::Blocked(BlockedReason::MissingCapacity),
                }
            }
            _ => EditorResponse::None,
        }
    }

    fn commit_rect(&mut self, model: &mut LayoutModel, rect: Rect) -> EditorResponse {
        match self.tool {
            Tool::Stage => {
                model.set_stage(rect);
                EditorResponse::StageSet(rect)
            }
            Tool::Area => {
                self.pending = Some(Pending::AreaName { rect });
                EditorResponse::AreaNamePrompt(rect)
            }
            Tool::ZoneSeats => {
                let Some(tier) = self.active_tier else {
                    return EditorResponse::Blocked(BlockedReason::MissingPriceTier);
                };
                match generators::generate_grid_seats(model, rect, self.zone_seat_count, tier) {
                    Ok(ids) => EditorResponse::Generated(ids),
                    Err(_) => EditorResponse::Blocked(BlockedReason::MissingPriceTier),
                }
            }
            Tool::ZoneTables => {
                let Some(tier) = self.active_tier else {
                    return EditorResponse::Blocked(BlockedReason::MissingPriceTier);
                };
                if self.chair_capacity < 1 {
                    return EditorResponse::Blocked(BlockedReason::MissingCapacity);
                }
                match generators::generate_grid_tables(
                    model,
                    rect,
                    self.zone_table_count,
                    self.chair_capacity,
                    tier,
                ) {
                    Ok(ids) => EditorResponse::Generated(ids),
                    Err(_) => EditorResponse::Blocked(BlockedReason::MissingCapacity),
                }
            }
            _ => EditorResponse::None,
        }
    }

    /// Snapshot every element that will move: the selection plus the chairs
    /// of every selected table
    fn begin_drag(&mut self, model: &LayoutModel, start: Point) {
        let mut moving: Vec<ElementId> = Vec::new();
        for &id in &self.selection {
            if !moving.contains(&id) {
                moving.push(id);
            }
            for &chair in model.chairs_of(id) {
                if !moving.contains(&chair) {
                    moving.push(chair);
                }
            }
        }
        let snapshot = moving
            .into_iter()
            .filter_map(|id| model.position(id).map(|p| (id, p)))
            .collect();
        self.gesture = Gesture::Drag { start, snapshot };
    }
}
