//! Bounded lock acquisition
//!
//! A wait that outlasts `LOCK_SPIN_LIMIT` attempts means a task held a lock
//! far longer than one frame; the caller treats that as fatal.

use spin::{Mutex, MutexGuard};

use crate::consts::LOCK_SPIN_LIMIT;
use crate::error::LockTimeout;

/// Acquire `lock`, yielding between attempts, up to the standard limit
pub fn acquire<'a, T>(
    lock: &'a Mutex<T>,
    name: &'static str,
) -> Result<MutexGuard<'a, T>, LockTimeout> {
    acquire_within(lock, name, LOCK_SPIN_LIMIT)
}

/// Acquire `lock` within `attempts` tries
pub fn acquire_within<'a, T>(
    lock: &'a Mutex<T>,
    name: &'static str,
    attempts: u32,
) -> Result<MutexGuard<'a, T>, LockTimeout> {
    for _ in 0..attempts {
        if let Some(guard) = lock.try_lock() {
            return Ok(guard);
        }
        // Let the holder finish its critical section
        std::thread::yield_now();
    }
    Err(LockTimeout {
        lock: name,
        attempts,
    })
}
