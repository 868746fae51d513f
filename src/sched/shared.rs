//! Lock-guarded state shared between tasks
//!
//! One lock per writer group: the simulation lock covers the whole
//! `GameState`, while the pot reading and the swap flag each have their own
//! lock so the two samplers never contend with each other. The button is a
//! single edge event raised from interrupt context, so it is an atomic.

use std::sync::atomic::{AtomicBool, Ordering};

use spin::{Mutex, MutexGuard};

use super::lock::acquire;
use crate::consts::POT_MAX;
use crate::error::LockTimeout;
use crate::sim::GameState;

pub const SIM_LOCK: &str = "sim";
pub const POT_LOCK: &str = "pot";
pub const SWAP_LOCK: &str = "swap";

pub struct Shared {
    sim: Mutex<GameState>,
    pot: Mutex<u16>,
    swap: Mutex<bool>,
    button: AtomicBool,
}

impl Default for Shared {
    fn default() -> Self {
        Self::new(GameState::new())
    }
}

impl Shared {
    pub fn new(state: GameState) -> Self {
        Self {
            sim: Mutex::new(state),
            // Mid-scale: cannon level until the first sample lands
            pot: Mutex::new(POT_MAX / 2),
            swap: Mutex::new(false),
            button: AtomicBool::new(false),
        }
    }

    pub fn lock_sim(&self) -> Result<MutexGuard<'_, GameState>, LockTimeout> {
        acquire(&self.sim, SIM_LOCK)
    }

    pub fn lock_pot(&self) -> Result<MutexGuard<'_, u16>, LockTimeout> {
        acquire(&self.pot, POT_LOCK)
    }

    pub fn lock_swap(&self) -> Result<MutexGuard<'_, bool>, LockTimeout> {
        acquire(&self.swap, SWAP_LOCK)
    }

    /// Button edge (interrupt handler side)
    pub fn press_button(&self) {
        self.button.store(true, Ordering::Release);
    }

    /// Consume a pending button press
    pub fn take_button(&self) -> bool {
        self.button.swap(false, Ordering::AcqRel)
    }

    /// Unwrap the session once all tasks are done with it
    pub fn into_state(self) -> GameState {
        self.sim.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionPhase;

    #[test]
    fn test_button_is_consumed_once() {
        let shared = Shared::default();
        assert!(!shared.take_button());
        shared.press_button();
        shared.press_button();
        assert!(shared.take_button());
        assert!(!shared.take_button());
    }

    #[test]
    fn test_locks_are_independent() {
        let shared = Shared::default();
        let _sim = shared.lock_sim().unwrap();
        // Samplers can still publish while a frame is in progress
        *shared.lock_pot().unwrap() = 100;
        *shared.lock_swap().unwrap() = true;
        assert_eq!(*shared.lock_pot().unwrap(), 100);
    }

    #[test]
    fn test_into_state() {
        let shared = Shared::default();
        assert_eq!(shared.into_state().phase, SessionPhase::Title);
    }
}
