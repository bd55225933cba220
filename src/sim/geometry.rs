//! Collision math for axis-aligned playfield geometry
//!
//! Everything in Neon Breaker is a circle (balls) or an axis-aligned
//! rectangle (bricks, paddle, lasers, power-ups), so these few primitives
//! cover every contact in the game.

use glam::Vec2;

/// Axis-aligned rectangle, top-left origin, y down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle from a top-left corner and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Face of a rectangle struck by a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Outward unit normal of this face
    pub fn normal(&self) -> Vec2 {
        match self {
            Side::Left => Vec2::new(-1.0, 0.0),
            Side::Right => Vec2::new(1.0, 0.0),
            Side::Top => Vec2::new(0.0, -1.0),
            Side::Bottom => Vec2::new(0.0, 1.0),
        }
    }
}

/// Circle vs rectangle overlap (touching counts as a hit)
pub fn circle_rect_intersect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half = rect.half_extents();
    let dist = (center - rect.center()).abs();

    if dist.x > half.x + radius || dist.y > half.y + radius {
        return false;
    }
    if dist.x <= half.x || dist.y <= half.y {
        return true;
    }

    // Corner region
    let corner = dist - half;
    corner.length_squared() <= radius * radius
}

/// Rectangle vs rectangle overlap
#[inline]
pub fn rect_intersect(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Classify which face of `rect` a ball centered at `point` struck.
///
/// Compares the offsets from the rectangle center normalized by the half
/// extents, so a wide brick hit near its end still reports a side face.
/// Ties resolve to the top/bottom faces.
pub fn collision_side(point: Vec2, rect: &Rect) -> Side {
    let delta = point - rect.center();
    let half = rect.half_extents();

    if delta.x.abs() / half.x > delta.y.abs() / half.y {
        if delta.x > 0.0 { Side::Right } else { Side::Left }
    } else if delta.y > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    }
}
