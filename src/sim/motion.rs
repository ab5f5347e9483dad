//! Decay-bounce motion engine
//!
//! Drives one body's position under exponential-decay friction, reflecting
//! velocity components elastically whenever the body reaches the inset arena
//! bounds. The engine knows nothing about scoring: each step reports a tagged
//! event and the owner decides what a counter hit means, halting the motion
//! from outside once it has snapped the body clear.
//!
//! Velocity follows `v(t) = v0 * exp(-friction * t)` and the position delta
//! over a step integrates that curve in closed form, so there is no per-frame
//! integration drift in the decay itself; only wall contacts are resolved at
//! step granularity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DECAY_FRICTION, REST_SPEED};
use crate::reflect_velocity;

/// Outcome of advancing a motion by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    /// Still decaying inside the bounds
    Continue,
    /// A bound was reached this step; the offending velocity axis was
    /// reflected and the decay relaunched from the wall
    BoundBounced,
    /// Velocity fell below the rest threshold (or the motion was halted);
    /// terminal, the body will not move again
    Rest,
}

/// One body's in-flight decay motion.
///
/// Position is owned by the caller and passed into `step`; the motion owns
/// only velocity and bounds. Dropping or halting the motion is how the drag
/// controller revokes its permission to keep mutating position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayMotion {
    /// Legal range for the body center, inset by the body radius
    min: Vec2,
    max: Vec2,
    velocity: Vec2,
    friction: f32,
    rest_speed: f32,
    finished: bool,
}

impl DecayMotion {
    /// Launch a motion within `arena_size`, bounds inset by `body_radius` on
    /// every side. Degenerate arenas (smaller than the body) collapse the
    /// legal range to a point instead of inverting it.
    pub fn new(arena_size: Vec2, body_radius: f32, initial_velocity: Vec2) -> Self {
        Self::with_friction(
            arena_size,
            body_radius,
            initial_velocity,
            DECAY_FRICTION,
            REST_SPEED,
        )
    }

    pub fn with_friction(
        arena_size: Vec2,
        body_radius: f32,
        initial_velocity: Vec2,
        friction: f32,
        rest_speed: f32,
    ) -> Self {
        let min = Vec2::splat(body_radius);
        let max = (arena_size - Vec2::splat(body_radius)).max(min);
        Self {
            min,
            max,
            velocity: initial_velocity,
            friction,
            rest_speed,
            finished: false,
        }
    }

    /// Current (decayed) velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// External stop: the owner has taken over the position (counter hit or a
    /// new drag). The motion reports `Rest` from here on.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.finished = true;
    }

    /// Advance the motion by `dt` seconds, mutating `pos` in place.
    ///
    /// A position starting outside the bounds (a body released at the screen
    /// edge) is coerced back in before anything else happens.
    pub fn step(&mut self, pos: &mut Vec2, dt: f32) -> MotionStep {
        if self.finished {
            return MotionStep::Rest;
        }
        *pos = pos.clamp(self.min, self.max);
        if self.velocity == Vec2::ZERO {
            // Zero launch velocity ends immediately at rest, no bounce
            self.finished = true;
            return MotionStep::Rest;
        }

        // Closed-form integration of v(t) = v0 * e^(-f t) over the step
        let decay = (-self.friction * dt).exp();
        *pos += self.velocity * (1.0 - decay) / self.friction;
        self.velocity *= decay;

        // Elastic reflection: land exactly on the bound, flip that axis of
        // the terminal velocity, leave the other axis untouched. An axis
        // resting on a bound with no velocity into it is not a bounce
        // (a body sliding along a wall just continues).
        let mut bounced = false;
        if (pos.x <= self.min.x || pos.x >= self.max.x) && self.velocity.x != 0.0 {
            pos.x = pos.x.clamp(self.min.x, self.max.x);
            self.velocity = reflect_velocity(self.velocity, Vec2::X);
            bounced = true;
        }
        if (pos.y <= self.min.y || pos.y >= self.max.y) && self.velocity.y != 0.0 {
            pos.y = pos.y.clamp(self.min.y, self.max.y);
            self.velocity = reflect_velocity(self.velocity, Vec2::Y);
            bounced = true;
        }

        if self.velocity.length() < self.rest_speed {
            self.velocity = Vec2::ZERO;
            self.finished = true;
            return MotionStep::Rest;
        }

        if bounced {
            return MotionStep::BoundBounced;
        }

        MotionStep::Continue
    }
}

/// Outward launch velocity for an ejected body: direction from `origin` to
/// `pos`, scaled to `magnitude`. Coincident points fall back to `Vec2::X`.
pub fn explode_velocity(pos: Vec2, origin: Vec2, magnitude: f32) -> Vec2 {
    let direction = (pos - origin).normalize_or_zero();
    let direction = if direction == Vec2::ZERO { Vec2::X } else { direction };
    direction * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn arena() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_zero_velocity_rests_immediately() {
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::ZERO);
        let mut pos = Vec2::new(400.0, 300.0);
        assert_eq!(motion.step(&mut pos, SIM_DT), MotionStep::Rest);
        assert_eq!(pos, Vec2::new(400.0, 300.0));
        assert!(motion.is_finished());
    }

    #[test]
    fn test_zero_velocity_launch_out_of_bounds_is_coerced_back_in() {
        // Dragged to the screen edge and released without a flick: the body
        // center starts inside the wall inset and must not rest there
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::ZERO);
        let mut pos = Vec2::new(2.0, 300.0);
        assert_eq!(motion.step(&mut pos, SIM_DT), MotionStep::Rest);
        assert_eq!(pos, Vec2::new(32.0, 300.0));
    }

    #[test]
    fn test_moving_launch_out_of_bounds_is_coerced_back_in() {
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(200.0, 0.0));
        let mut pos = Vec2::new(790.0, 610.0);
        motion.step(&mut pos, SIM_DT);
        assert!(pos.x >= 32.0 && pos.x <= 768.0);
        assert!(pos.y >= 32.0 && pos.y <= 568.0);
    }

    #[test]
    fn test_sliding_along_a_wall_is_not_a_bounce() {
        // Launched flush along the top edge: the y axis rests on the bound
        // with no velocity into it, so no step reports a bounce
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(300.0, 0.0));
        let mut pos = Vec2::new(100.0, 32.0);
        loop {
            match motion.step(&mut pos, SIM_DT) {
                MotionStep::Continue => assert_eq!(pos.y, 32.0),
                MotionStep::Rest => break,
                MotionStep::BoundBounced => panic!("wall slide reported as a bounce"),
            }
        }
        // Travel budget v0 / friction keeps it clear of the right wall
        assert!(pos.x < 768.0);
    }

    #[test]
    fn test_decay_approaches_rest_without_walls() {
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(50.0, 0.0));
        let mut pos = Vec2::new(400.0, 300.0);
        let mut steps = 0;
        loop {
            match motion.step(&mut pos, SIM_DT) {
                MotionStep::Continue => steps += 1,
                MotionStep::Rest => break,
                MotionStep::BoundBounced => panic!("slow launch should never reach a wall"),
            }
            assert!(steps < 10_000, "decay never rested");
        }
        // Closed-form travel limit is v0 / friction ≈ 11.9 units
        assert!(pos.x > 400.0 && pos.x < 400.0 + 50.0 / DECAY_FRICTION + 1e-3);
        assert_eq!(motion.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_wall_reflection_flips_one_axis() {
        // Fast launch straight at the right wall from nearby
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(2000.0, 120.0));
        let mut pos = Vec2::new(750.0, 300.0);

        let mut bounced = false;
        for _ in 0..200 {
            let v_before = motion.velocity();
            match motion.step(&mut pos, SIM_DT) {
                MotionStep::BoundBounced => {
                    // Landed exactly on the bound
                    assert_eq!(pos.x, 800.0 - 32.0);
                    let v_after = motion.velocity();
                    // Wall axis: flipped sign, equal magnitude to the decayed
                    // terminal velocity; other axis unaffected by the bounce
                    assert!(v_after.x < 0.0);
                    assert!(v_after.x.abs() <= v_before.x.abs());
                    assert!(v_after.y > 0.0);
                    bounced = true;
                    break;
                }
                MotionStep::Continue => {}
                MotionStep::Rest => panic!("rested before reaching the wall"),
            }
        }
        assert!(bounced);
    }

    #[test]
    fn test_bounce_preserves_terminal_magnitude_on_wall_axis() {
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(3000.0, 0.0));
        let mut pos = Vec2::new(700.0, 300.0);
        loop {
            match motion.step(&mut pos, SIM_DT) {
                MotionStep::BoundBounced => break,
                MotionStep::Continue => {}
                MotionStep::Rest => panic!("unexpected rest"),
            }
        }
        let decay = (-DECAY_FRICTION * SIM_DT).exp();
        // Reconstruct: the terminal x velocity is some v0 * decay^k; the
        // reflected velocity magnitude must sit on that decay curve
        let speed = motion.velocity().x.abs();
        let mut expected = 3000.0;
        let mut on_curve = false;
        for _ in 0..200 {
            expected *= decay;
            if (speed - expected).abs() < 1e-2 {
                on_curve = true;
                break;
            }
        }
        assert!(on_curve, "reflected speed {speed} not on the decay curve");
    }

    #[test]
    fn test_halt_is_terminal() {
        let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(500.0, 0.0));
        let mut pos = Vec2::new(100.0, 100.0);
        assert_eq!(motion.step(&mut pos, SIM_DT), MotionStep::Continue);
        motion.halt();
        let before = pos;
        assert_eq!(motion.step(&mut pos, SIM_DT), MotionStep::Rest);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_degenerate_arena_never_panics() {
        // Arena smaller than the body: legal range collapses to a point
        let mut motion = DecayMotion::new(Vec2::new(10.0, 10.0), 32.0, Vec2::new(900.0, -400.0));
        let mut pos = Vec2::new(5.0, 5.0);
        for _ in 0..2_000 {
            if motion.step(&mut pos, SIM_DT) == MotionStep::Rest {
                break;
            }
        }
        assert_eq!(pos, Vec2::splat(32.0));
    }

    #[test]
    fn test_explode_velocity_points_away_from_origin() {
        let origin = Vec2::new(400.0, 300.0);
        let v = explode_velocity(Vec2::new(400.0, 500.0), origin, 1920.0);
        assert!((v - Vec2::new(0.0, 1920.0)).length() < 1e-3);
    }

    #[test]
    fn test_explode_at_origin_uses_fallback_direction() {
        let origin = Vec2::new(400.0, 300.0);
        let v = explode_velocity(origin, origin, 1920.0);
        assert_eq!(v, Vec2::new(1920.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_bounds_after_any_bounce(
            vx in -5000.0f32..5000.0, vy in -5000.0f32..5000.0,
            px in 32.0f32..768.0, py in 32.0f32..568.0,
        ) {
            let mut motion = DecayMotion::new(arena(), 32.0, Vec2::new(vx, vy));
            let mut pos = Vec2::new(px, py);
            for _ in 0..500 {
                let step = motion.step(&mut pos, SIM_DT);
                prop_assert!(pos.x >= 32.0 && pos.x <= 768.0);
                prop_assert!(pos.y >= 32.0 && pos.y <= 568.0);
                if step == MotionStep::Rest {
                    break;
                }
            }
        }

        #[test]
        fn prop_explode_magnitude_is_fixed(
            px in -1000.0f32..1000.0, py in -1000.0f32..1000.0,
        ) {
            let v = explode_velocity(Vec2::new(px, py), Vec2::ZERO, 1920.0);
            prop_assert!((v.length() - 1920.0).abs() < 1e-2);
        }
    }
}
