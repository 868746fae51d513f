//! The five cooperative tasks
//!
//! Each `step` is one unit of work followed by an implicit yield back to the
//! scheduler. No task holds a lock across a yield.

use crate::error::TaskError;
use crate::platform::{AnalogInput, Clock, DigitalInput, IndicatorSink, RenderSink, elapsed_secs};
use crate::pot_to_degrees;
use crate::sim::{TickInput, tick};
use crate::view::{RenderSnapshot, indicator_leds};

use super::shared::Shared;

/// A unit of cooperative work
pub trait Task {
    fn name(&self) -> &'static str;

    /// Run one unit of work and return (yield)
    fn step(&mut self, shared: &Shared) -> Result<(), TaskError>;
}

/// Publishes the latest potentiometer reading
pub struct PotSampler<A> {
    input: A,
}

impl<A: AnalogInput> PotSampler<A> {
    pub fn new(input: A) -> Self {
        Self { input }
    }
}

impl<A: AnalogInput> Task for PotSampler<A> {
    fn name(&self) -> &'static str {
        "pot"
    }

    fn step(&mut self, shared: &Shared) -> Result<(), TaskError> {
        // Sample before locking; conversion may block
        let raw = self.input.sample();
        *shared.lock_pot()? = raw;
        Ok(())
    }
}

/// Raises the swap flag on each released-to-held joystick edge
pub struct JoystickSampler<D> {
    input: D,
    was_held: bool,
}

impl<D: DigitalInput> JoystickSampler<D> {
    pub fn new(input: D) -> Self {
        Self {
            input,
            was_held: false,
        }
    }
}

impl<D: DigitalInput> Task for JoystickSampler<D> {
    fn name(&self) -> &'static str {
        "joystick"
    }

    fn step(&mut self, shared: &Shared) -> Result<(), TaskError> {
        let held = self.input.is_held();
        if held && !self.was_held {
            *shared.lock_swap()? = true;
        }
        self.was_held = held;
        Ok(())
    }
}

/// Runs one simulation frame under the simulation lock
pub struct SimulationTask<C> {
    clock: C,
    last_micros: Option<u32>,
}

impl<C: Clock> SimulationTask<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_micros: None,
        }
    }
}

impl<C: Clock> Task for SimulationTask<C> {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn step(&mut self, shared: &Shared) -> Result<(), TaskError> {
        let cannon_degrees = pot_to_degrees(*shared.lock_pot()?);
        let swap = std::mem::take(&mut *shared.lock_swap()?);
        let button = shared.take_button();

        let now = self.clock.now_micros();
        let dt = self
            .last_micros
            .map_or(0.0, |last| elapsed_secs(last, now));
        self.last_micros = Some(now);

        let input = TickInput {
            cannon_degrees,
            swap,
            button,
            // Human timing of the start press is the entropy source
            seed: now as u16,
        };

        let mut state = shared.lock_sim()?;
        tick(&mut state, &input, dt)?;
        Ok(())
    }
}

/// Copies a consistent snapshot out and hands it to the renderer
pub struct RenderTask<R> {
    sink: R,
}

impl<R: RenderSink> RenderTask<R> {
    pub fn new(sink: R) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }
}

impl<R: RenderSink> Task for RenderTask<R> {
    fn name(&self) -> &'static str {
        "render"
    }

    fn step(&mut self, shared: &Shared) -> Result<(), TaskError> {
        let snapshot = {
            let mut state = shared.lock_sim()?;
            RenderSnapshot::take(&mut state)
        };
        self.sink.present(&snapshot);
        Ok(())
    }
}

/// Mirrors the score multiplier onto the LEDs
pub struct IndicatorTask<I> {
    sink: I,
}

impl<I: IndicatorSink> IndicatorTask<I> {
    pub fn new(sink: I) -> Self {
        Self { sink }
    }
}

impl<I: IndicatorSink> Task for IndicatorTask<I> {
    fn name(&self) -> &'static str {
        "indicator"
    }

    fn step(&mut self, shared: &Shared) -> Result<(), TaskError> {
        let multiplier = shared.lock_sim()?.multiplier;
        self.sink.show(indicator_leds(multiplier));
        Ok(())
    }
}
