//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (cosmetic palette)
//! - Stable per-body iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod drag;
pub mod flingable;
pub mod intersect;
pub mod motion;
pub mod velocity;

pub use arena::{ArenaEvent, ArenaState, Counter, TickInput, tick};
pub use drag::{DragController, DragOutcome, PointerEvent, PointerId};
pub use flingable::{BodyId, Color, Flingable, ring_positions};
pub use intersect::{Intersection, intersect};
pub use motion::{DecayMotion, MotionStep, explode_velocity};
pub use velocity::VelocityTracker;
