//! Marble Kombat - marble-chain arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (train, bullet, splice, collapse, session)
//! - `sched`: Cooperative round-robin tasks over lock-guarded shared state
//! - `platform`: Input, clock and output collaborator traits
//! - `view`: Read-only snapshots handed to rendering and indicator output

pub mod error;
pub mod platform;
pub mod sched;
pub mod sim;
pub mod view;

pub use error::{ChainFault, LockTimeout, SchedError, SimError, TaskError};
pub use sched::{Scheduler, Shared};
pub use sim::{GameState, MarbleColor, SessionPhase};
pub use view::RenderSnapshot;

/// Game design constants (fixed rules, not runtime configurable)
pub mod consts {
    /// Marble diameter in pixels; also the contact threshold
    pub const MARBLE_DIAMETER: f32 = 16.0;
    /// Train advance speed (pixels per second)
    pub const TRAIN_SPEED: f32 = 8.0;
    /// Bullet flight speed (pixels per second)
    pub const BULLET_SPEED: f32 = 125.0;

    /// Playfield dimensions
    pub const WINDOW_X: f32 = 240.0;
    pub const WINDOW_Y: f32 = 320.0;

    /// Cannon pivot
    pub const CANNON_X: f32 = 25.0;
    pub const CANNON_Y: f32 = WINDOW_Y / 2.0;

    /// Train spawn column and root position
    pub const TRAIN_X: f32 = WINDOW_X - 40.0;
    pub const TRAIN_START_Y: f32 = MARBLE_DIAMETER;
    pub const STARTING_MARBLES: usize = 7;

    /// Minimum touching same-color run that collapses
    pub const COLLAPSE_RUN: usize = 3;
    /// Base points per collapse, scaled by (multiplier + 1)
    pub const SCORE_PER_COLLAPSE: u32 = 10;

    /// Marble arena capacity (train + bullet, with lots of headroom)
    pub const MAX_MARBLES: usize = 64;

    /// try_lock attempts before a lock wait is declared failed
    pub const LOCK_SPIN_LIMIT: u32 = 0xFFFF;

    /// Full-scale potentiometer reading (12-bit ADC)
    pub const POT_MAX: u16 = 4095;
    /// ADC counts per degree of cannon rotation
    pub const POT_COUNTS_PER_DEGREE: f32 = 34.125;
    /// Cannon angle at full-scale reading (degrees)
    pub const CANNON_MIN_DEGREES: f32 = -60.0;
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: i32) -> f32 {
    (degrees as f32).to_radians()
}

/// Convert a raw potentiometer sample to whole cannon degrees in [-60, 60]
#[inline]
pub fn pot_to_degrees(raw: u16) -> i32 {
    use consts::*;
    let raw = raw.min(POT_MAX);
    ((POT_MAX - raw) as f32 / POT_COUNTS_PER_DEGREE + CANNON_MIN_DEGREES) as i32
}
