//! Auto-layout generators
//!
//! Deterministic bulk placement: grid seats in a zone, radial chairs around
//! a table, and a grid of chaired tables. All three append to the model
//! without touching existing elements.

use tracing::debug;

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{Point, Rect};
use crate::model::{ElementId, LayoutModel};

/// Drawn size of an individual seat
pub const SEAT_SIZE: f64 = 10.0;
/// Zone padding for grid seat generation
pub const SEAT_PADDING: f64 = 20.0;
/// Minimum gap between grid seats
pub const SEAT_MIN_SPACING: f64 = 8.0;

/// Drawn size of a chair
pub const CHAIR_SIZE: f64 = 12.0;
/// Gap between a table edge and its chairs
pub const CHAIR_CLEARANCE: f64 = 4.0;

/// Side length of a generated table
pub const TABLE_SIZE: f64 = 32.0;
/// Zone padding for grid table generation
pub const TABLE_PADDING: f64 = 30.0;
/// Minimum gap between grid tables, wide enough for surrounding chairs
pub const TABLE_MIN_SPACING: f64 = 60.0;

/// Row-major grid of `count` item centers inside a zone
///
/// Columns are `ceil(sqrt(count))`, rows whatever that needs. Spacing
/// spreads items across the zone interior but never drops below
/// `min_spacing`.
fn grid_centers(
    zone: Rect,
    count: usize,
    item_size: f64,
    padding: f64,
    min_spacing: f64,
) -> Vec<Point> {
    let columns = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(columns);

    let avail_w = zone.width - 2.0 * padding - columns as f64 * item_size;
    let avail_h = zone.height - 2.0 * padding - rows as f64 * item_size;
    let spacing_x = if columns > 1 {
        min_spacing.max(avail_w / (columns - 1) as f64)
    } else {
        0.0
    };
    let spacing_y = if rows > 1 {
        min_spacing.max(avail_h / (rows - 1) as f64)
    } else {
        0.0
    };

    (0..count)
        .map(|i| {
            let col = (i % columns) as f64;
            let row = (i / columns) as f64;
            Point::new(
                zone.x + padding + col * (item_size + spacing_x) + item_size / 2.0,
                zone.y + padding + row * (item_size + spacing_y) + item_size / 2.0,
            )
        })
        .collect()
}

/// Fill a zone with `count` individual seats in a grid
///
/// Labels continue the `A{n}` sequence from the current individual-seat
/// count; the save-time renumber makes them authoritative.
pub fn generate_grid_seats(
    model: &mut LayoutModel,
    zone: Rect,
    count: usize,
    price_tier_id: i64,
) -> LayoutResult<Vec<ElementId>> {
    if count == 0 {
        return Err(LayoutError::EmptyGeneration);
    }
    let start = model.individual_seat_count();
    let centers = grid_centers(zone, count, SEAT_SIZE, SEAT_PADDING, SEAT_MIN_SPACING);
    let mut ids = Vec::with_capacity(count);
    for (i, center) in centers.into_iter().enumerate() {
        let label = format!("A{}", start + i + 1);
        ids.push(model.add_seat(center, label, price_tier_id, None)?);
    }
    debug!(count, zone = ?zone, "generated grid seats");
    Ok(ids)
}

/// Surround a table with chairs according to its stored capacity
///
/// Capacity is split over the four sides in fixed order top, right,
/// bottom, left; each side takes `ceil(capacity/4)` until the remainder
/// runs out, so the total always equals the capacity. Chairs sit
/// [`CHAIR_CLEARANCE`] outside the table edge, evenly spaced along it, and
/// are labeled 1..=capacity continuing across sides.
pub fn generate_radial_chairs(
    model: &mut LayoutModel,
    table_id: ElementId,
) -> LayoutResult<Vec<ElementId>> {
    let table = model.table(table_id).ok_or(LayoutError::NotATable(table_id))?;
    let rect = table.rect;
    let capacity = table.chair_capacity;
    let tier = table.price_tier_id;
    if capacity < 1 {
        return Err(LayoutError::InvalidCapacity(capacity));
    }

    let per_side = (capacity as usize).div_ceil(4);
    let mut remaining = capacity as usize;
    let mut side_counts = [0usize; 4];
    for slot in &mut side_counts {
        *slot = per_side.min(remaining);
        remaining -= *slot;
    }

    let out = CHAIR_CLEARANCE + CHAIR_SIZE / 2.0;
    let mut ids = Vec::with_capacity(capacity as usize);
    let mut label = 1;
    for (side, &n) in side_counts.iter().enumerate() {
        for i in 0..n {
            let t = (i + 1) as f64 / (n + 1) as f64;
            let pos = match side {
                // top
                0 => Point::new(rect.x + rect.width * t, rect.y - out),
                // right
                1 => Point::new(rect.x + rect.width + out, rect.y + rect.height * t),
                // bottom
                2 => Point::new(rect.x + rect.width * t, rect.y + rect.height + out),
                // left
                _ => Point::new(rect.x - out, rect.y + rect.height * t),
            };
            ids.push(model.add_seat(pos, label.to_string(), tier, Some(table_id))?);
            label += 1;
        }
    }
    Ok(ids)
}

/// Create one table centered at a point and populate its chairs
pub fn place_table(
    model: &mut LayoutModel,
    at: Point,
    chair_capacity: i32,
    price_tier_id: i64,
) -> LayoutResult<ElementId> {
    let rect = Rect::new(at.x - TABLE_SIZE / 2.0, at.y - TABLE_SIZE / 2.0, TABLE_SIZE, TABLE_SIZE);
    let number = model.table_count() as i32 + 1;
    let table_id = model.add_table(rect, number, chair_capacity, price_tier_id)?;
    generate_radial_chairs(model, table_id)?;
    Ok(table_id)
}

/// Fill a zone with a grid of tables, each with its radial chairs
///
/// Table numbers continue from the existing table count.
pub fn generate_grid_tables(
    model: &mut LayoutModel,
    zone: Rect,
    table_count: usize,
    chairs_per_table: i32,
    price_tier_id: i64,
) -> LayoutResult<Vec<ElementId>> {
    if table_count == 0 {
        return Err(LayoutError::EmptyGeneration);
    }
    if chairs_per_table < 1 {
        return Err(LayoutError::InvalidCapacity(chairs_per_table));
    }
    let centers = grid_centers(zone, table_count, TABLE_SIZE, TABLE_PADDING, TABLE_MIN_SPACING);
    let start_number = model.table_count() as i32;
    let mut ids = Vec::with_capacity(table_count);
    for (i, center) in centers.into_iter().enumerate() {
        let rect = Rect::new(
            center.x - TABLE_SIZE / 2.0,
            center.y - TABLE_SIZE / 2.0,
            TABLE_SIZE,
            TABLE_SIZE,
        );
        let table_id = model.add_table(rect, start_number + i as i32 + 1, chairs_per_table, price_tier_id)?;
        generate_radial_chairs(model, table_id)?;
        ids.push(table_id);
    }
    debug!(table_count, chairs_per_table, "generated grid tables");
    Ok(ids)
}
