//! Collision detection for the bird, pipes and pickups
//!
//! Everything is axis-aligned in screen space (y grows downward). The bird is
//! tested as its square bounding box against pipes and as a circle against
//! pickups.

use glam::Vec2;

/// Axis-aligned rectangle in screen coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box enclosing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test: rectangles that only share an edge don't collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Bird touching the top or bottom of the playfield
pub fn circle_out_of_bounds(center_y: f32, radius: f32, screen_height: f32) -> bool {
    center_y - radius <= 0.0 || center_y + radius >= screen_height
}

/// Bird bounding box overlapping any of the given rects
pub fn circle_box_hits_any<'a>(
    center: Vec2,
    radius: f32,
    rects: impl IntoIterator<Item = &'a Rect>,
) -> bool {
    let bbox = Rect::around_circle(center, radius);
    rects.into_iter().any(|r| bbox.intersects(r))
}

/// Two circles overlapping
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}
