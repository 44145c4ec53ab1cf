//! Swept axis-aligned box collision
//!
//! Boxes move at constant velocity over a time slice. Rather than sampling
//! the overlap at the start of the frame only, each axis yields the interval
//! of time during which the boxes overlap on that axis, and the boxes collide
//! when the per-axis intervals share an instant inside `[0, dt]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square box of side `size` centered on `center`
    pub fn from_center(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(0.5 * size);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Static overlap test (touching edges count as overlapping)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }
}

/// Interval `[t_first, t_last]` during which the boxes may still overlap
#[derive(Debug, Clone, Copy)]
struct Window {
    t_first: f32,
    t_last: f32,
}

impl Window {
    /// Narrow the window by one axis.
    ///
    /// `a_min..a_max` / `b_min..b_max` are the extents on this axis and `rv`
    /// is the velocity of B relative to A. Returns `false` when the boxes
    /// can never meet on this axis during the slice.
    fn narrow(&mut self, a_min: f32, a_max: f32, b_min: f32, b_max: f32, rv: f32) -> bool {
        if rv < 0.0 {
            // B drifts toward -axis: already past A on that side means no hit
            if a_min > b_max {
                return false;
            }
            if a_max < b_min {
                self.t_first = self.t_first.max((a_max - b_min) / rv);
            }
            if a_min < b_max {
                self.t_last = self.t_last.min((a_min - b_max) / rv);
            }
        } else if rv > 0.0 {
            if a_max < b_min {
                return false;
            }
            if a_min > b_max {
                self.t_first = self.t_first.max((a_min - b_max) / rv);
            }
            if a_max > b_min {
                self.t_last = self.t_last.min((a_max - b_min) / rv);
            }
        } else if a_min > b_max || a_max < b_min {
            // No relative motion: separated now means separated for the slice
            return false;
        }

        self.t_first <= self.t_last
    }
}

/// Check whether two moving boxes overlap at any instant in `[0, dt]`.
///
/// `vel_a` and `vel_b` are constant over the slice. A zero `dt` degrades to
/// a static overlap test. The result only depends on the relative velocity,
/// so swapping `(a, vel_a)` with `(b, vel_b)` gives the same answer.
pub fn intersects(a: &Aabb, vel_a: Vec2, b: &Aabb, vel_b: Vec2, dt: f32) -> bool {
    if a.overlaps(b) {
        return true;
    }

    let rv = vel_b - vel_a;
    let mut window = Window {
        t_first: 0.0,
        t_last: dt,
    };

    window.narrow(a.min.x, a.max.x, b.min.x, b.max.x, rv.x)
        && window.narrow(a.min.y, a.max.y, b.min.y, b.max.y, rv.y)
}
