//! Fling Down - a fling-and-feed physics toy
//!
//! Circular bodies bounce around a rectangular arena under exponential-decay
//! friction. The player drags and flings them into a central "counter" circle
//! to score; counting the score down ejects every scored body back out.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, motion, gestures, arena state)
//! - `tuning`: Data-driven gameplay balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Flingable body defaults
    pub const FLINGABLE_RADIUS: f32 = 32.0;
    pub const FLINGABLE_COUNT: usize = 10;

    /// Counter (scoring target) defaults
    pub const COUNTER_BASE_RADIUS: f32 = 64.0;
    /// Radius gained per scored body
    pub const COUNTER_GROWTH: f32 = 8.0;

    /// Outward launch speed when the counter ejects its bodies
    pub const EXPLODE_SPEED: f32 = 1920.0;

    /// Exponential decay friction constant (1/s); velocity follows
    /// `v(t) = v0 * exp(-friction * t)`
    pub const DECAY_FRICTION: f32 = 4.2;
    /// Speed below which a decaying body is considered at rest (units/s)
    pub const REST_SPEED: f32 = 0.1;

    /// Separation pushed between a scoring body and the counter edge
    pub const HIT_EPSILON: f32 = 1.0;

    /// Seconds between countdown decrements
    pub const COUNTDOWN_INTERVAL: f32 = 1.0;
}

/// Reflect velocity off a surface: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_velocity_flips_only_the_normal_component() {
        let v = reflect_velocity(Vec2::new(3.0, -2.0), Vec2::X);
        assert_eq!(v, Vec2::new(-3.0, -2.0));
        let v = reflect_velocity(Vec2::new(3.0, -2.0), Vec2::Y);
        assert_eq!(v, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_reflect_velocity_preserves_speed() {
        let v = Vec2::new(5.0, 12.0);
        let n = Vec2::new(1.0, 1.0).normalize();
        assert!((reflect_velocity(v, n).length() - v.length()).abs() < 1e-4);
    }
}
