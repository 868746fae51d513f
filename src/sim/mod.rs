//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time is passed in, never read
//! - Seeded LFSR only
//! - Stable chain order (root to tail)
//! - No rendering, locking or platform dependencies

pub mod chain;
pub mod collapse;
pub mod motion;
pub mod rng;
pub mod splice;
pub mod state;
pub mod tick;

pub use chain::{ChainIter, Marble, MarbleId, Train};
pub use collapse::{Collapse, collapse};
pub use motion::{
    CONTACT_SPACING, FlightStep, Impact, advance_bullet, advance_train, collides, find_impact,
    in_playfield, push_from,
};
pub use rng::Lfsr16;
pub use splice::{SpliceSide, splice};
pub use state::{Bullet, Flight, GameState, MarbleColor, SessionPhase};
pub use tick::{ShotOutcome, TickInput, TickReport, tick};
