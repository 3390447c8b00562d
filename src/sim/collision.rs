//! Axis-aligned collision tests
//!
//! The player's hitbox and spike traps are plain rectangles; the overlap test
//! shrinks both boxes inward by a fixed leniency padding so near-misses that
//! would feel unfair don't end the run.

use serde::{Deserialize, Serialize};

use crate::consts::HIT_PADDING;

/// An axis-aligned box. `y` is the top edge (screen coordinates, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    /// Shrink the box inward by `pad` on every side. Degenerate boxes
    /// (padding larger than a half-extent) collapse to zero size.
    pub fn shrunk(&self, pad: f32) -> Self {
        let w = (self.w - 2.0 * pad).max(0.0);
        let h = (self.h - 2.0 * pad).max(0.0);
        Self {
            x: self.x + (self.w - w) / 2.0,
            y: self.y + (self.h - h) / 2.0,
            w,
            h,
        }
    }

    /// Strict overlap test; touching edges do not count and empty boxes
    /// overlap nothing
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// The run-ending test: both boxes shrunk by the leniency padding, then overlapped
pub fn padded_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.shrunk(HIT_PADDING).overlaps(&b.shrunk(HIT_PADDING))
}
