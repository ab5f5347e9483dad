//! Arena state and the per-frame tick
//!
//! Composition root of the toy: one drag controller and one motion slot per
//! body, the counter circle in the middle, the score count and the countdown.
//! Everything advances through `tick` in body-id order - the cooperative
//! single-clock model - so each body's position has exactly one owner at any
//! instant and two bodies never mutate shared state concurrently.
//!
//! `tick` reports what happened as tagged events; the presentation layer maps
//! `Scored` to its score display, `Exploded` to whatever fanfare it likes.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

use super::drag::{DragController, DragOutcome, PointerEvent};
use super::flingable::{BodyId, Color, Flingable, ring_positions};
use super::intersect::intersect;
use super::motion::{DecayMotion, MotionStep, explode_velocity};

/// The central scoring target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Counter {
    pub center: Vec2,
    pub radius: f32,
}

impl Counter {
    /// Counter geometry is derived, never stored: centered in the arena,
    /// radius growing linearly with the score count.
    fn derive(arena_size: Vec2, tuning: &Tuning, count: u32) -> Self {
        Self {
            center: arena_size / 2.0,
            radius: tuning.counter_base_radius + tuning.counter_growth * count as f32,
        }
    }
}

/// Who currently owns a body's position
#[derive(Debug, Clone, Serialize, Deserialize)]
enum BodyControl {
    /// At rest; nobody is mutating the position
    Idle,
    /// The motion engine owns the position
    Bouncing(DecayMotion),
    /// A drag controller owns the position
    Dragged,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Viewport size change; bodies are re-seated on the spawn ring
    pub resize: Option<Vec2>,
    /// This frame's pointer events, in arrival order
    pub events: Vec<PointerEvent>,
    /// The counter was pressed (starts the countdown when the count is > 0)
    pub press_counter: bool,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaEvent {
    /// A drag took over the body, revoking its in-flight motion
    Grabbed { body: BodyId },
    /// A drag ended and the body was relaunched
    Flung { body: BodyId },
    /// The body hit the counter: count incremented, body deactivated
    Scored { body: BodyId },
    CountdownStarted,
    CountdownTick { remaining: u32 },
    /// Count reached zero: every body ejected outward and reactivated
    Exploded,
}

/// Complete toy state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaState {
    /// Run seed (cosmetic palette only)
    pub seed: u64,
    pub arena_size: Vec2,
    /// Bodies in id order; `bodies[i].id == i`
    pub bodies: Vec<Flingable>,
    controls: Vec<BodyControl>,
    controllers: Vec<DragController>,
    /// Scored-body count shown on the counter
    pub count: u32,
    pub counting_down: bool,
    countdown_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    tuning: Tuning,
}

impl ArenaState {
    /// Create an arena with its bodies seated on the spawn ring around the
    /// counter.
    pub fn new(seed: u64, arena_size: Vec2, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let counter = Counter::derive(arena_size, &tuning, 0);
        let positions = ring_positions(
            tuning.flingable_count,
            counter.center,
            counter.radius,
            tuning.flingable_radius,
        );

        let bodies: Vec<Flingable> = positions
            .into_iter()
            .enumerate()
            .map(|(i, pos)| {
                let color = if tuning.random_palette {
                    Color::random(&mut rng)
                } else {
                    Color::alternating(i)
                };
                let mut body = Flingable::new(i as BodyId, tuning.flingable_radius, color);
                body.pos = pos;
                body
            })
            .collect();

        let n = bodies.len();
        Self {
            seed,
            arena_size,
            bodies,
            controls: vec![BodyControl::Idle; n],
            controllers: vec![DragController::new(); n],
            count: 0,
            counting_down: false,
            countdown_timer: 0.0,
            time_ticks: 0,
            tuning,
        }
    }

    /// Current counter geometry
    pub fn counter(&self) -> Counter {
        Counter::derive(self.arena_size, &self.tuning, self.count)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// True while the motion engine owns this body's position
    pub fn is_bouncing(&self, body: BodyId) -> bool {
        matches!(self.controls.get(body as usize), Some(BodyControl::Bouncing(_)))
    }

    pub fn is_dragged(&self, body: BodyId) -> bool {
        self.controllers
            .get(body as usize)
            .is_some_and(DragController::is_dragging)
    }

    /// Viewport change: every body is re-seated on the spawn ring and any
    /// in-flight motion or drag is abandoned.
    pub fn resize(&mut self, arena_size: Vec2) {
        self.arena_size = arena_size;
        let counter = self.counter();
        let positions = ring_positions(
            self.bodies.len(),
            counter.center,
            counter.radius,
            self.tuning.flingable_radius,
        );
        for (i, pos) in positions.into_iter().enumerate() {
            self.bodies[i].pos = pos;
            self.controls[i] = BodyControl::Idle;
            self.controllers[i].cancel();
        }
    }

    /// Snapshot the full state as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a snapshot
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn launch(&mut self, body: usize, velocity: Vec2) {
        self.controls[body] = BodyControl::Bouncing(DecayMotion::with_friction(
            self.arena_size,
            self.bodies[body].radius,
            velocity,
            self.tuning.friction,
            self.tuning.rest_speed,
        ));
    }

    /// Score one body: bump the count, deactivate, free its control slot.
    fn score(&mut self, body: usize, events: &mut Vec<ArenaEvent>) {
        self.count += 1;
        self.bodies[body].active = false;
        self.controls[body] = BodyControl::Idle;
        log::info!("body {} fed to the counter, count = {}", body, self.count);
        events.push(ArenaEvent::Scored { body: body as BodyId });
    }
}

/// Advance the arena by one fixed timestep.
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) -> Vec<ArenaEvent> {
    let mut events = Vec::new();

    if let Some(size) = input.resize {
        state.resize(size);
    }

    route_pointer_events(state, &input.events, &mut events);

    // The sweep runs only when a score grew the counter this tick; a body
    // merely dragged across the counter never scores
    let count_before = state.count;
    step_motions(state, dt, &mut events);
    if state.count != count_before {
        growth_sweep(state, &mut events);
    }

    run_countdown(state, input.press_counter, dt, &mut events);

    state.time_ticks += 1;
    events
}

/// Deliver this frame's pointer events to the per-body controllers.
///
/// Presses go to the body under the pointer: a body already mid-drag sees the
/// foreign press as an identity change (release, then the new pointer grabs
/// it straight back); otherwise the first idle body accepting the press wins.
/// Moves and lifts go to whichever controller owns that pointer.
fn route_pointer_events(
    state: &mut ArenaState,
    incoming: &[PointerEvent],
    events: &mut Vec<ArenaEvent>,
) {
    for event in incoming {
        match *event {
            PointerEvent::Down { pos, .. } => {
                let pressed_dragged_body = (0..state.bodies.len()).find(|&i| {
                    state.controllers[i].is_dragging()
                        && (pos - state.bodies[i].pos).length() <= state.bodies[i].radius
                });

                if let Some(i) = pressed_dragged_body {
                    let outcome = state.controllers[i].handle(&mut state.bodies[i], event);
                    if let DragOutcome::Released { velocity } = outcome {
                        state.launch(i, velocity);
                        events.push(ArenaEvent::Flung { body: i as BodyId });
                        // The new pointer grabs the body right back
                        if state.controllers[i].handle(&mut state.bodies[i], event)
                            == DragOutcome::Grabbed
                        {
                            state.controls[i] = BodyControl::Dragged;
                            events.push(ArenaEvent::Grabbed { body: i as BodyId });
                        }
                    }
                    continue;
                }

                for i in 0..state.bodies.len() {
                    if state.controllers[i].is_dragging() {
                        continue;
                    }
                    if state.controllers[i].handle(&mut state.bodies[i], event)
                        == DragOutcome::Grabbed
                    {
                        state.controls[i] = BodyControl::Dragged;
                        events.push(ArenaEvent::Grabbed { body: i as BodyId });
                        break;
                    }
                }
            }
            PointerEvent::Move { .. } | PointerEvent::Up { .. } => {
                let pointer = event.pointer();
                let owner = (0..state.bodies.len())
                    .find(|&i| state.controllers[i].owning_pointer() == Some(pointer));
                let Some(i) = owner else { continue };

                match state.controllers[i].handle(&mut state.bodies[i], event) {
                    DragOutcome::Released { velocity } => {
                        state.launch(i, velocity);
                        events.push(ArenaEvent::Flung { body: i as BodyId });
                    }
                    DragOutcome::Moved | DragOutcome::Grabbed | DragOutcome::Ignored => {}
                }
            }
        }
    }
}

/// Step every bouncing body and run the counter hit test after each step.
fn step_motions(state: &mut ArenaState, dt: f32, events: &mut Vec<ArenaEvent>) {
    for i in 0..state.bodies.len() {
        if !state.bodies[i].active {
            continue;
        }
        let counter = state.counter();
        let hit_epsilon = state.tuning.hit_epsilon;

        let BodyControl::Bouncing(motion) = &mut state.controls[i] else {
            continue;
        };
        let body = &mut state.bodies[i];
        let step = motion.step(&mut body.pos, dt);

        if let Some(hit) = intersect(body.pos, body.radius, counter.center, counter.radius) {
            // Resolve the overlap along the contact normal with a little
            // breathing room, then stop this launch for good
            body.pos += hit.normal * (hit.depth + hit_epsilon);
            motion.halt();
            state.score(i, events);
            continue;
        }

        if step == MotionStep::Rest {
            state.controls[i] = BodyControl::Idle;
        }
    }
}

/// Each scored body grows the counter; the grown counter can swallow bodies
/// that were already resting against it. Cascade until stable.
fn growth_sweep(state: &mut ArenaState, events: &mut Vec<ArenaEvent>) {
    loop {
        let counter = state.counter();
        let swallowed = (0..state.bodies.len()).find(|&i| {
            state.bodies[i].active
                && intersect(
                    state.bodies[i].pos,
                    state.bodies[i].radius,
                    counter.center,
                    counter.radius,
                )
                .is_some()
        });

        match swallowed {
            Some(i) => state.score(i, events),
            None => break,
        }
    }
}

/// Countdown state machine: one decrement per interval of simulated time,
/// ejecting and reactivating every body when the count reaches zero.
fn run_countdown(state: &mut ArenaState, press: bool, dt: f32, events: &mut Vec<ArenaEvent>) {
    if press && !state.counting_down && state.count > 0 {
        state.counting_down = true;
        state.countdown_timer = state.tuning.countdown_interval;
        log::info!("countdown started from {}", state.count);
        events.push(ArenaEvent::CountdownStarted);
    }

    if !state.counting_down {
        return;
    }

    state.countdown_timer -= dt;
    while state.countdown_timer <= 0.0 && state.count > 0 {
        state.count -= 1;
        state.countdown_timer += state.tuning.countdown_interval;
        events.push(ArenaEvent::CountdownTick { remaining: state.count });
    }

    if state.count == 0 {
        explode_all(state, events);
        state.counting_down = false;
    }
}

/// Eject every body outward from the counter center at the fixed magnitude.
///
/// The hit test is live from the very first step afterwards, so a body that
/// still overlaps the (now shrunken) counter re-scores immediately.
fn explode_all(state: &mut ArenaState, events: &mut Vec<ArenaEvent>) {
    let counter = state.counter();
    let speed = state.tuning.explode_speed;

    for i in 0..state.bodies.len() {
        state.controllers[i].cancel();
        state.bodies[i].active = true;
        let velocity = explode_velocity(state.bodies[i].pos, counter.center, speed);
        state.launch(i, velocity);
    }

    log::info!("counter emptied, {} bodies ejected", state.bodies.len());
    events.push(ArenaEvent::Exploded);
}
