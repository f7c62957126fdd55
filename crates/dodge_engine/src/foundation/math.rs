//! Math utilities and types
//!
//! Provides the 2D vector type and the axis-aligned rectangle used by both
//! the broad phase and the narrow phase.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle in world units
///
/// `(x, y)` is the top-left corner; `y` grows downward as in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rectangle {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle with its top-left corner at `position`
    pub fn from_position(position: Vec2, width: f32, height: f32) -> Self {
        Self::new(position.x, position.y, width, height)
    }

    /// Left edge
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Top-left corner
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Open overlap test
    ///
    /// Rectangles that only share an edge or a corner do not intersect.
    pub fn intersects_with(&self, other: &Self) -> bool {
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }

    /// Closed overlap test, touching edges count
    ///
    /// Used by the broad phase where over-reporting is harmless.
    pub fn touches(&self, other: &Self) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Half-open point containment: `[left, right) x [top, bottom)`
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Closed containment of another rectangle
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Split into four equal quadrants
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(&self) -> [Self; 4] {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        [
            Self::new(self.x, self.y, half_w, half_h),
            Self::new(self.x + half_w, self.y, half_w, half_h),
            Self::new(self.x, self.y + half_h, half_w, half_h),
            Self::new(self.x + half_w, self.y + half_h, half_w, half_h),
        ]
    }
}
