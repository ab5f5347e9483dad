//! Flingable body entity
//!
//! A flingable is a circular body that can be dragged, flung, bounced and
//! scored. It owns no behavior: position is mutated by whichever of the drag
//! controller or the motion engine currently controls the body.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Stable body identifier (also the index into the arena's body list)
pub type BodyId = u32;

/// Cosmetic body color, linear RGB in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Random color from the arena's seeded RNG
    pub fn random(rng: &mut Pcg32) -> Self {
        Self {
            r: rng.random(),
            g: rng.random(),
            b: rng.random(),
        }
    }

    /// Two-tone palette alternating by body index
    pub fn alternating(index: usize) -> Self {
        if index % 2 == 0 {
            Self::new(0.01, 0.87, 0.77)
        } else {
            Self::new(0.0, 0.65, 0.60)
        }
    }
}

/// A circular physical body in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flingable {
    pub id: BodyId,
    /// Fixed at creation; insets the wall bounds and sizes collision tests
    pub radius: f32,
    pub pos: Vec2,
    /// Inactive bodies are excluded from physics, hit tests and grabbing
    pub active: bool,
    pub color: Color,
}

impl Flingable {
    pub fn new(id: BodyId, radius: f32, color: Color) -> Self {
        Self {
            id,
            radius,
            // Default rest position: tucked into the top-left corner
            pos: Vec2::splat(radius),
            active: true,
            color,
        }
    }
}

/// Evenly spaced spawn positions on a ring around the counter.
///
/// Body `i` of `n` sits at angle `2πi/n` on a circle two body-radii clear of
/// the counter edge.
pub fn ring_positions(
    count: usize,
    center: Vec2,
    counter_radius: f32,
    body_radius: f32,
) -> Vec<Vec2> {
    let ring = counter_radius + 2.0 * body_radius;
    (0..count)
        .map(|i| {
            let radians = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
            center + Vec2::new(radians.cos(), radians.sin()) * ring
        })
        .collect()
}
