//! Marble Kombat headless demo
//!
//! Drives the full task set with a simulated player: a wandering cannon
//! potentiometer, an occasional joystick flick, and periodic button presses.
//! Frames are logged instead of drawn. Once the session ends, the final
//! snapshot is printed as JSON.
//!
//! Environment:
//! - `MARBLE_SEED`: seeds the simulated player and, with the fixed-step
//!   clock, the session itself (defaults to the wall clock)
//! - `MARBLE_MAX_ROUNDS`: scheduler round limit (default 20000)
//! - `MARBLE_REALTIME`: `true` to pace frames at 60 Hz on the host clock.
//!   Each round then lasts at least one frame, so the default round limit
//!   allows about five and a half minutes of play; an untouched train
//!   reaches the finish line in well under a minute.
//! - `RUST_LOG`: log filter (default `info`)

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use marble_kombat::consts::POT_MAX;
use marble_kombat::platform::{
    AnalogInput, Clock, DigitalInput, IndicatorSink, ManualClock, PacedClock, RenderSink,
};
use marble_kombat::sched::{Shared, Task};
use marble_kombat::view::RenderSnapshot;
use marble_kombat::{Scheduler, TaskError};

const DEFAULT_MAX_ROUNDS: u64 = 20_000;
/// Frame length at 60 Hz
const FRAME_MICROS: u32 = 16_667;
/// Chance per round that the simulated player presses the button
const PRESS_CHANCE: f64 = 0.03;

/// Potentiometer that drifts randomly across its range
struct WanderingPot {
    rng: Pcg32,
    raw: u16,
}

impl AnalogInput for WanderingPot {
    fn sample(&mut self) -> u16 {
        let step: i32 = self.rng.random_range(-60..=60);
        self.raw = (self.raw as i32 + step).clamp(0, POT_MAX as i32) as u16;
        self.raw
    }
}

/// Joystick that is flicked now and then
struct Flicker {
    rng: Pcg32,
}

impl DigitalInput for Flicker {
    fn is_held(&mut self) -> bool {
        self.rng.random_bool(0.01)
    }
}

/// Stands in for the button interrupt
struct Trigger {
    rng: Pcg32,
}

impl Task for Trigger {
    fn name(&self) -> &'static str {
        "trigger"
    }

    fn step(&mut self, shared: &Shared) -> Result<(), TaskError> {
        if self.rng.random_bool(PRESS_CHANCE) {
            shared.press_button();
        }
        Ok(())
    }
}

/// Logs frames that ask for a full redraw
struct LogRenderer;

impl RenderSink for LogRenderer {
    fn present(&mut self, frame: &RenderSnapshot) {
        if frame.redraw {
            log::info!(
                "[{:?}] {} marbles, score {} {:?}",
                frame.phase,
                frame.chain.len(),
                frame.score_text,
                frame.banner
            );
        }
    }
}

/// Logs multiplier changes
struct LogIndicator {
    last: Option<u8>,
}

impl IndicatorSink for LogIndicator {
    fn show(&mut self, leds: u8) {
        if self.last != Some(leds) {
            log::debug!("LEDs {leds:08b}");
            self.last = Some(leds);
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable {key}={raw}");
            default
        }),
        Err(_) => default,
    }
}

fn wall_clock_seed() -> u16 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_micros() as u16)
        .unwrap_or(1)
}

/// Run one session to its end; returns the final snapshot
fn play(
    clock: impl Clock,
    seed: u16,
    max_rounds: u64,
) -> Result<RenderSnapshot, marble_kombat::SchedError> {
    // Independent streams per simulated input
    let rng = |stream: u64| Pcg32::seed_from_u64((stream << 16) | seed as u64);

    let shared = Shared::default();
    // The first press leaves the title screen
    shared.press_button();

    let mut sched = Scheduler::standard(
        WanderingPot {
            rng: rng(0),
            raw: POT_MAX / 2,
        },
        Flicker { rng: rng(1) },
        clock,
        LogRenderer,
        LogIndicator { last: None },
    );
    sched.spawn(Trigger { rng: rng(2) });

    let ran = sched.run_until(&shared, max_rounds, |state| state.phase.is_terminal())?;
    let state = shared.into_state();
    log::info!(
        "{ran} rounds, {} frames, phase {:?}, score {}",
        state.frames,
        state.phase,
        state.score
    );
    Ok(RenderSnapshot::capture(&state))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Marble Kombat (headless) starting...");

    let seed = env_or("MARBLE_SEED", wall_clock_seed());
    let max_rounds = env_or("MARBLE_MAX_ROUNDS", DEFAULT_MAX_ROUNDS);
    let realtime = env_or("MARBLE_REALTIME", false);

    let result = if realtime {
        play(PacedClock::new(FRAME_MICROS), seed, max_rounds)
    } else {
        // Start the clock at the seed so the first press reads it back
        play(ManualClock::new(seed as u32, FRAME_MICROS), seed, max_rounds)
    };

    match result {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Snapshot serialization failed: {e}"),
        },
        Err(e) => {
            log::error!("System halted: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
