//! Geometry kernel
//!
//! World-space primitives and hit testing. All positions live in a single
//! fixed world space `[0,0] × [sheet_width, sheet_height]`; both the
//! authoring surface and the customer view map world to screen through the
//! same uniform [`Viewport`] transform so persisted coordinates render
//! identically in both.

/// Hit radius for individual seats (drawn larger than chairs)
pub const SEAT_HIT_RADIUS: f64 = 8.0;
/// Hit radius for chairs
pub const CHAIR_HIT_RADIUS: f64 = 6.0;

/// A point in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise offset
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two corners, drawn in any direction
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Inclusive-bounds containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn surface(&self) -> f64 {
        self.width * self.height
    }
}

/// Radius hit test for seats and chairs
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Uniform world↔screen transform
///
/// One scale factor for both axes plus centering offsets; never stretches
/// the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    /// Fit a sheet into a canvas, keeping `margin` pixels free on each axis
    pub fn fit(canvas_w: f64, canvas_h: f64, margin: f64, sheet_w: f64, sheet_h: f64) -> Self {
        let scale = ((canvas_w - margin) / sheet_w).min((canvas_h - margin) / sheet_h);
        Self {
            scale,
            offset_x: (canvas_w - sheet_w * scale) / 2.0,
            offset_y: (canvas_h - sheet_h * scale) / 2.0,
        }
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset_x, p.y * self.scale + self.offset_y)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }
}
