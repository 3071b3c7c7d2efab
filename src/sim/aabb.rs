//! Axis-aligned bounding boxes
//!
//! Every entity and the player are plain rectangles described by a center
//! point and a size. Screen space has its origin at the bottom-left corner
//! with y pointing up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Center point
    pub center: Vec2,
    /// Full width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    /// Strict overlap test. Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// Center position that keeps this box inside `[0, width] x [0, height]`
    ///
    /// A box larger than the bounds is pinned to the left/bottom edge.
    pub fn clamped_center(&self, width: f32, height: f32) -> Vec2 {
        let half = self.size / 2.0;
        let x = self.center.x.min(width - half.x).max(half.x);
        let y = self.center.y.min(height - half.y).max(half.y);
        Vec2::new(x, y)
    }
}
