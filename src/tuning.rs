//! Data-driven gameplay balance
//!
//! Every feel-related constant lives here with a serde default, so a JSON
//! blob can override any subset of fields without restating the rest.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Gameplay tuning values. All fields default from `consts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of flingable bodies spawned at startup
    pub flingable_count: usize,
    /// Body radius (world units)
    pub flingable_radius: f32,
    /// Counter radius at score zero
    pub counter_base_radius: f32,
    /// Counter radius gained per scored body
    pub counter_growth: f32,
    /// Outward launch speed when the counter ejects its bodies
    pub explode_speed: f32,
    /// Exponential decay friction constant (1/s)
    pub friction: f32,
    /// Speed below which a decaying body rests (units/s)
    pub rest_speed: f32,
    /// Separation left between a scoring body and the counter edge
    pub hit_epsilon: f32,
    /// Seconds between countdown decrements
    pub countdown_interval: f32,
    /// Random per-body colors (seeded) instead of the alternating two-tone
    pub random_palette: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            flingable_count: consts::FLINGABLE_COUNT,
            flingable_radius: consts::FLINGABLE_RADIUS,
            counter_base_radius: consts::COUNTER_BASE_RADIUS,
            counter_growth: consts::COUNTER_GROWTH,
            explode_speed: consts::EXPLODE_SPEED,
            friction: consts::DECAY_FRICTION,
            rest_speed: consts::REST_SPEED,
            hit_epsilon: consts::HIT_EPSILON,
            countdown_interval: consts::COUNTDOWN_INTERVAL,
            random_palette: false,
        }
    }
}

impl Tuning {
    /// Parse a JSON override blob; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_are_defaults() {
        assert_eq!(Tuning::from_json("{}").unwrap(), Tuning::default());
    }

    #[test]
    fn test_partial_override_keeps_other_fields() {
        let tuning = Tuning::from_json(r#"{"explode_speed": 500.0, "flingable_count": 3}"#)
            .unwrap();
        assert_eq!(tuning.explode_speed, 500.0);
        assert_eq!(tuning.flingable_count, 3);
        assert_eq!(tuning.friction, Tuning::default().friction);
        assert_eq!(tuning.counter_growth, Tuning::default().counter_growth);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
