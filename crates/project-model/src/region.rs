//! Normalized rectangles and points used by crop and zoom payloads.
//!
//! All coordinates are normalized to `[0.0, 1.0]` relative to the
//! recording's frame so they survive resolution changes.

use serde::{Deserialize, Serialize};

/// A rectangle within the recorded frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge (normalized).
    pub x: f64,
    /// Top edge (normalized).
    pub y: f64,
    /// Width (normalized).
    pub w: f64,
    /// Height (normalized).
    pub h: f64,
}

impl Region {
    /// The whole frame.
    pub const FULL: Region = Region {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    /// Create a region, clamping it to stay inside the frame.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let w = w.clamp(0.01, 1.0); // minimum 1% width
        let h = h.clamp(0.01, 1.0);
        Self {
            x: x.clamp(0.0, 1.0 - w),
            y: y.clamp(0.0, 1.0 - h),
            w,
            h,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        (self.x + self.w).min(1.0)
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        (self.y + self.h).min(1.0)
    }

    /// Fraction of the frame covered (0.0 to 1.0).
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Whether this region leaves the frame untouched.
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Check if a normalized point is inside this region.
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::FULL
    }
}

/// A 2D normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const CENTER: Point2D = Point2D { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::CENTER
    }
}
