//! Per-body drag gesture controller
//!
//! One controller per flingable, fed the pointer event stream scoped to that
//! body. A press inside the body's radius grabs it (the arena revokes any
//! in-flight motion on that outcome); while dragging, the body's position
//! tracks the pointer delta 1:1 and every sample feeds the velocity tracker;
//! lifting the pointer - or the active pointer changing identity mid-drag,
//! the ambiguous multi-touch handoff - releases the body with the tracker's
//! velocity estimate for the relaunch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::flingable::Flingable;
use super::velocity::VelocityTracker;

/// Opaque pointer identity (finger/mouse id from the presentation layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// A raw pointer sample delivered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        pointer: PointerId,
        time_ms: u64,
        pos: Vec2,
    },
    Move {
        pointer: PointerId,
        time_ms: u64,
        pos: Vec2,
    },
    Up {
        pointer: PointerId,
        time_ms: u64,
        pos: Vec2,
    },
}

impl PointerEvent {
    pub fn pointer(&self) -> PointerId {
        match *self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer, .. } => pointer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum DragState {
    Idle,
    Dragging { pointer: PointerId, last_pos: Vec2 },
}

/// What the owner must do after an event was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Event was not for this controller (or the body declined it)
    Ignored,
    /// Press accepted: revoke the body's in-flight motion, drag owns the
    /// position from now on
    Grabbed,
    /// Position snapped to follow the pointer
    Moved,
    /// Gesture ended: relaunch the body with the captured velocity
    Released { velocity: Vec2 },
}

/// Drag state machine for a single body.
///
/// Keeps watching even while the body is inactive so the gesture loop resumes
/// once the body is reactivated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragController {
    state: DragState,
    tracker: VelocityTracker,
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer currently owning this body, if any
    pub fn owning_pointer(&self) -> Option<PointerId> {
        match self.state {
            DragState::Dragging { pointer, .. } => Some(pointer),
            DragState::Idle => None,
        }
    }

    /// Abandon any live gesture without a release (used when the counter
    /// ejects its bodies and takes the positions over wholesale).
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
        self.tracker.reset();
    }

    /// Feed one pointer event through the state machine, snapping the body's
    /// position while a drag is live.
    pub fn handle(&mut self, body: &mut Flingable, event: &PointerEvent) -> DragOutcome {
        match self.state {
            DragState::Idle => match *event {
                PointerEvent::Down { pointer, time_ms, pos } => {
                    // Accept only presses landing on an active body
                    if !body.active || (pos - body.pos).length() > body.radius {
                        return DragOutcome::Ignored;
                    }
                    self.tracker.reset();
                    self.tracker.push(time_ms, pos);
                    self.state = DragState::Dragging { pointer, last_pos: pos };
                    log::debug!("body {} grabbed by pointer {}", body.id, pointer.0);
                    DragOutcome::Grabbed
                }
                _ => DragOutcome::Ignored,
            },
            DragState::Dragging { pointer: owner, last_pos } => match *event {
                PointerEvent::Move { pointer, time_ms, pos } if pointer == owner => {
                    body.pos += pos - last_pos;
                    self.tracker.push(time_ms, pos);
                    self.state = DragState::Dragging { pointer: owner, last_pos: pos };
                    DragOutcome::Moved
                }
                PointerEvent::Up { pointer, .. } if pointer == owner => self.release(body),
                // Active pointer changed identity mid-drag: same termination
                // as a lift, not an error
                PointerEvent::Down { .. } | PointerEvent::Move { .. } | PointerEvent::Up { .. } => {
                    self.release(body)
                }
            },
        }
    }

    fn release(&mut self, body: &Flingable) -> DragOutcome {
        let velocity = self.tracker.velocity();
        self.state = DragState::Idle;
        log::debug!(
            "body {} released at ({:.1}, {:.1}) with velocity ({:.0}, {:.0})",
            body.id,
            body.pos.x,
            body.pos.y,
            velocity.x,
            velocity.y
        );
        DragOutcome::Released { velocity }
    }
}
