//! Platform abstraction layer
//!
//! The simulation core only talks to hardware through these traits:
//! - Analog cannon input (potentiometer sample)
//! - Digital swap input (joystick held / released)
//! - Monotonic microsecond clock (frame timing and session seed)
//! - Render and indicator outputs

use std::time::{Duration, Instant};

use crate::view::RenderSnapshot;

/// Raw 12-bit potentiometer reading source
pub trait AnalogInput {
    /// Block until a conversion completes and return it (0..=4095)
    fn sample(&mut self) -> u16;
}

/// Level-sensitive digital input
pub trait DigitalInput {
    fn is_held(&mut self) -> bool;
}

/// Monotonic clock in microseconds; wraps like a hardware timer
pub trait Clock {
    fn now_micros(&mut self) -> u32;
}

/// Consumer of render snapshots (LCD driver or a test recorder)
pub trait RenderSink {
    fn present(&mut self, frame: &RenderSnapshot);
}

/// Consumer of the multiplier LED pattern
pub trait IndicatorSink {
    fn show(&mut self, leds: u8);
}

/// Host clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_micros(&mut self) -> u32 {
        self.origin.elapsed().as_micros() as u32
    }
}

/// Host clock that holds each read back until a full frame has passed
/// since the previous one, pacing a caller that reads once per frame
#[derive(Debug, Clone)]
pub struct PacedClock {
    inner: SystemClock,
    frame_micros: u32,
    deadline: Option<u32>,
}

impl PacedClock {
    pub fn new(frame_micros: u32) -> Self {
        Self {
            inner: SystemClock::default(),
            frame_micros,
            deadline: None,
        }
    }
}

impl Clock for PacedClock {
    fn now_micros(&mut self) -> u32 {
        let mut now = self.inner.now_micros();
        if let Some(deadline) = self.deadline {
            // Signed distance keeps this correct across counter wrap
            let wait = deadline.wrapping_sub(now) as i32;
            if wait > 0 {
                std::thread::sleep(Duration::from_micros(wait as u64));
                now = self.inner.now_micros();
            }
        }
        self.deadline = Some(now.wrapping_add(self.frame_micros));
        now
    }
}

/// Clock that advances a fixed step on every read
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: u32,
    step: u32,
}

impl ManualClock {
    pub fn new(start: u32, step: u32) -> Self {
        Self { now: start, step }
    }
}

impl Clock for ManualClock {
    fn now_micros(&mut self) -> u32 {
        let now = self.now;
        self.now = self.now.wrapping_add(self.step);
        now
    }
}

/// Seconds between two clock readings, tolerant of counter wrap
#[inline]
pub fn elapsed_secs(earlier: u32, later: u32) -> f32 {
    later.wrapping_sub(earlier) as f32 / 1_000_000.0
}
