//! Axis-aligned rectangle collision
//!
//! Every gameplay entity is a box in screen space (y grows downward), so a
//! strict AABB overlap test is all the detector needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Check whether two rectangles overlap
///
/// Strict on both axes: rectangles that only share an edge do not collide.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Vertical displacement that moves `mover` out of `obstacle` through the nearer face
///
/// Negative pushes up (onto the obstacle's top), positive pushes down.
pub fn vertical_push_out(mover: &Rect, obstacle: &Rect) -> f32 {
    let up = obstacle.top() - mover.bottom();
    let down = obstacle.bottom() - mover.top();
    if up.abs() <= down.abs() { up } else { down }
}
