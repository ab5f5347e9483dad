//! Release-velocity estimation from pointer samples
//!
//! During a drag the controller feeds timestamped pointer positions in here;
//! on release a single 2D velocity estimate comes out. The estimator is a
//! recency-weighted least-squares line fit over the last 100 ms of samples,
//! run independently per axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ring buffer capacity for gesture samples
const HISTORY_SIZE: usize = 20;

/// Only samples within this window of the newest one are used (ms)
const HORIZON_MS: u64 = 100;

/// Recency decay applied per sample going back in time
const RECENCY_DECAY: f32 = 0.95;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Sample {
    time_ms: u64,
    pos: Vec2,
}

/// Per-gesture velocity tracker.
///
/// Degenerates to zero velocity for empty, single-sample or zero-duration
/// input. `reset` between gestures; stale samples from a previous drag must
/// never leak into the next estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VelocityTracker {
    samples: Vec<Sample>,
    /// Next write slot once the buffer is full
    cursor: usize,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pointer sample. Capacity is bounded; the oldest sample is
    /// overwritten once `HISTORY_SIZE` is reached.
    pub fn push(&mut self, time_ms: u64, pos: Vec2) {
        if self.samples.len() < HISTORY_SIZE {
            self.samples.push(Sample { time_ms, pos });
        } else {
            self.samples[self.cursor] = Sample { time_ms, pos };
        }
        self.cursor = (self.cursor + 1) % HISTORY_SIZE;
    }

    /// Drop all samples, ready for the next gesture
    pub fn reset(&mut self) {
        self.samples.clear();
        self.cursor = 0;
    }

    /// Estimate the release velocity in units/second.
    pub fn velocity(&self) -> Vec2 {
        let Some(newest) = self.samples.iter().copied().max_by_key(|s| s.time_ms) else {
            return Vec2::ZERO;
        };

        // Newest-first within the horizon window
        let mut window: Vec<Sample> = self
            .samples
            .iter()
            .copied()
            .filter(|s| newest.time_ms.saturating_sub(s.time_ms) <= HORIZON_MS)
            .collect();
        window.sort_by(|a, b| b.time_ms.cmp(&a.time_ms));

        if window.len() < 2 {
            return Vec2::ZERO;
        }

        Vec2::new(
            fit_slope(&window, |s| s.pos.x, newest.time_ms),
            fit_slope(&window, |s| s.pos.y, newest.time_ms),
        )
    }
}

/// Weighted least-squares slope of `value` against time, in units/second.
///
/// Times are expressed as negative ages relative to the newest sample so the
/// fit is anchored at release. Weights decay going back in time.
fn fit_slope(window: &[Sample], value: impl Fn(&Sample) -> f32, newest_ms: u64) -> f32 {
    let mut sum_w = 0.0f32;
    let mut sum_t = 0.0f32;
    let mut sum_x = 0.0f32;
    let mut sum_tt = 0.0f32;
    let mut sum_tx = 0.0f32;

    for (i, sample) in window.iter().enumerate() {
        let w = RECENCY_DECAY.powi(i as i32);
        let t = -((newest_ms - sample.time_ms) as f32);
        let x = value(sample);

        sum_w += w;
        sum_t += w * t;
        sum_x += w * x;
        sum_tt += w * t * t;
        sum_tx += w * t * x;
    }

    let denom = sum_w * sum_tt - sum_t * sum_t;
    if denom.abs() < f32::EPSILON {
        // All samples share one timestamp: zero-duration gesture
        return 0.0;
    }

    // Slope is in units/ms
    (sum_w * sum_tx - sum_t * sum_x) / denom * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_is_zero() {
        assert_eq!(VelocityTracker::new().velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_single_sample_is_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.push(0, Vec2::new(100.0, 50.0));
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_zero_duration_gesture_is_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.push(10, Vec2::new(0.0, 0.0));
        tracker.push(10, Vec2::new(50.0, 50.0));
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_two_samples_match_displacement_direction() {
        let mut tracker = VelocityTracker::new();
        tracker.push(0, Vec2::new(10.0, 20.0));
        tracker.push(16, Vec2::new(42.0, 4.0));

        let v = tracker.velocity();
        let dir = (Vec2::new(42.0, 4.0) - Vec2::new(10.0, 20.0)).normalize();
        assert!((v.normalize() - dir).length() < 1e-4);
        // Two points pin the fit exactly: 32px over 16ms = 2000 px/s on x
        assert!((v.x - 2000.0).abs() < 1.0);
        assert!((v.y + 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_constant_velocity_recovered() {
        let mut tracker = VelocityTracker::new();
        // 3 px per ms along x = 3000 px/s
        for i in 0..8u64 {
            tracker.push(i * 10, Vec2::new(i as f32 * 30.0, 0.0));
        }
        let v = tracker.velocity();
        assert!((v.x - 3000.0).abs() < 50.0, "got {v:?}");
        assert!(v.y.abs() < 1.0);
    }

    #[test]
    fn test_samples_outside_horizon_ignored() {
        let mut tracker = VelocityTracker::new();
        // Ancient fast movement, then a slow recent drag
        tracker.push(0, Vec2::new(-10_000.0, 0.0));
        tracker.push(500, Vec2::new(0.0, 0.0));
        tracker.push(510, Vec2::new(1.0, 0.0));
        tracker.push(520, Vec2::new(2.0, 0.0));

        let v = tracker.velocity();
        // 1 px per 10ms = 100 px/s; the old sample would have skewed this huge
        assert!((v.x - 100.0).abs() < 10.0, "got {v:?}");
    }

    #[test]
    fn test_reset_clears_previous_gesture() {
        let mut tracker = VelocityTracker::new();
        tracker.push(0, Vec2::ZERO);
        tracker.push(10, Vec2::new(500.0, 0.0));
        tracker.reset();
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_ring_buffer_keeps_newest_samples() {
        let mut tracker = VelocityTracker::new();
        for i in 0..40u64 {
            tracker.push(i * 5, Vec2::new(i as f32 * 10.0, 0.0));
        }
        // 10 px per 5 ms = 2000 px/s, derived from the surviving tail
        let v = tracker.velocity();
        assert!((v.x - 2000.0).abs() < 50.0, "got {v:?}");
    }
}
