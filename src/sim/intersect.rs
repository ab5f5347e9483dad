//! Circle-circle intersection
//!
//! The single geometry query the whole toy is built on. Used for counter
//! scoring hits and for deflecting bodies back out of the counter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Result of a circle-circle overlap test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Unit vector from the second circle's center toward the first circle's
    /// center. Callers negate as needed.
    pub normal: Vec2,
    /// Overlap amount along the normal, always positive
    pub depth: f32,
}

/// Test two circles for overlap.
///
/// Returns `None` when the circles are separate or exactly touching
/// (`distance >= radius_a + radius_b`). Coincident centers are degenerate;
/// the normal falls back to `Vec2::X` so callers never divide by zero.
pub fn intersect(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
) -> Option<Intersection> {
    let diff = center_a - center_b;
    let distance = diff.length();
    let depth = (radius_a + radius_b) - distance;

    if depth <= 0.0 {
        return None;
    }

    let normal = if distance > 0.0 { diff / distance } else { Vec2::X };

    Some(Intersection { normal, depth })
}
