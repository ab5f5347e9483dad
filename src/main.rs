//! Fling Down entry point
//!
//! Headless demo driver: plays one scripted session against the simulation
//! and logs what happens. Configuration comes from the environment:
//! `FLING_SEED` picks the run seed, `FLING_TUNING` takes a JSON blob of
//! tuning overrides (any subset of fields).

use glam::Vec2;

use fling_down::Tuning;
use fling_down::consts::{MAX_SUBSTEPS, SIM_DT};
use fling_down::sim::{ArenaEvent, ArenaState, PointerEvent, PointerId, TickInput, tick};

const ARENA_SIZE: Vec2 = Vec2::new(800.0, 600.0);
/// Demo frames arrive at 60 Hz; the simulation substeps at `SIM_DT`
const FRAME_DT: f32 = 1.0 / 60.0;

/// Fixed-timestep driver: frames of arbitrary length in, `SIM_DT` ticks out.
struct Driver {
    state: ArenaState,
    accumulator: f32,
    events: Vec<ArenaEvent>,
}

impl Driver {
    fn new(state: ArenaState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            events: Vec::new(),
        }
    }

    /// Advance one frame. Pointer events and presses are delivered on the
    /// first substep only; the clamp keeps a long frame from spiraling.
    fn frame(&mut self, frame_dt: f32, mut input: TickInput) {
        self.accumulator += frame_dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.events.extend(tick(&mut self.state, &input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
            input.events.clear();
            input.press_counter = false;
        }
    }

    fn run_seconds(&mut self, seconds: f32) {
        let frames = (seconds / FRAME_DT).ceil() as usize;
        for _ in 0..frames {
            self.frame(FRAME_DT, TickInput::default());
        }
    }

    /// Scripted flick: press the body, pull it toward `target` and let go.
    fn fling(&mut self, body: usize, target: Vec2) {
        let start = self.state.bodies[body].pos;
        let dir = (target - start).normalize_or_zero();
        let t0 = self.state.time_ticks * (SIM_DT * 1000.0) as u64;

        let down = TickInput {
            events: vec![PointerEvent::Down { pointer: PointerId(1), time_ms: t0, pos: start }],
            ..TickInput::default()
        };
        self.frame(FRAME_DT, down);

        for i in 1..=4u64 {
            let mv = TickInput {
                events: vec![PointerEvent::Move {
                    pointer: PointerId(1),
                    time_ms: t0 + i * 10,
                    pos: start + dir * (i as f32 * 15.0),
                }],
                ..TickInput::default()
            };
            self.frame(FRAME_DT, mv);
        }

        let up = TickInput {
            events: vec![PointerEvent::Up {
                pointer: PointerId(1),
                time_ms: t0 + 50,
                pos: start + dir * 60.0,
            }],
            ..TickInput::default()
        };
        self.frame(FRAME_DT, up);
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::var("FLING_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let tuning = match std::env::var("FLING_TUNING") {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("ignoring malformed FLING_TUNING: {err}");
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let body_count = tuning.flingable_count;
    log::info!(
        "arena {}x{}, {} bodies, seed {}",
        ARENA_SIZE.x,
        ARENA_SIZE.y,
        body_count,
        seed
    );
    let mut driver = Driver::new(ArenaState::new(seed, ARENA_SIZE, tuning));

    // Feed every body to the counter, letting each launch settle first
    let center = driver.state.counter().center;
    for body in 0..body_count {
        driver.fling(body, center);
        driver.run_seconds(2.0);
    }
    log::info!(
        "all bodies flung: count = {}, counter radius = {:.0}",
        driver.state.count,
        driver.state.counter().radius
    );

    // Tap the counter and let the countdown run down to the explosion
    let press = TickInput { press_counter: true, ..TickInput::default() };
    driver.frame(FRAME_DT, press);
    driver.run_seconds(driver.state.count as f32 + 2.0);

    let scored = driver
        .events
        .iter()
        .filter(|e| matches!(e, ArenaEvent::Scored { .. }))
        .count();
    let exploded = driver.events.contains(&ArenaEvent::Exploded);
    println!("session over: {scored} bodies scored, exploded = {exploded}");
    println!(
        "final count = {}, {} bodies back in flight",
        driver.state.count,
        (0..body_count).filter(|&i| driver.state.is_bouncing(i as u32)).count()
    );
}
