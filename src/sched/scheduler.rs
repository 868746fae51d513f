//! Round-robin cooperative scheduler
//!
//! Tasks run in spawn order, one `step` each per round. A step that fails
//! halts the whole system; there is no recovery path.

use crate::error::SchedError;
use crate::platform::{AnalogInput, Clock, DigitalInput, IndicatorSink, RenderSink};
use crate::sim::GameState;

use super::shared::Shared;
use super::tasks::{IndicatorTask, JoystickSampler, PotSampler, RenderTask, SimulationTask, Task};

pub struct Scheduler<'a> {
    tasks: Vec<Box<dyn Task + 'a>>,
    rounds: u64,
}

impl Default for Scheduler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Scheduler<'a> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            rounds: 0,
        }
    }

    /// The five standard tasks: pot, joystick, simulation, render, indicator
    pub fn standard(
        pot: impl AnalogInput + 'a,
        joystick: impl DigitalInput + 'a,
        clock: impl Clock + 'a,
        renderer: impl RenderSink + 'a,
        indicator: impl IndicatorSink + 'a,
    ) -> Self {
        let mut sched = Self::new();
        sched.spawn(PotSampler::new(pot));
        sched.spawn(JoystickSampler::new(joystick));
        sched.spawn(SimulationTask::new(clock));
        sched.spawn(RenderTask::new(renderer));
        sched.spawn(IndicatorTask::new(indicator));
        sched
    }

    pub fn spawn(&mut self, task: impl Task + 'a) {
        log::debug!("spawned task `{}`", task.name());
        self.tasks.push(Box::new(task));
    }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    /// Rounds completed so far
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Give every task one step, in order
    pub fn run_round(&mut self, shared: &Shared) -> Result<(), SchedError> {
        for task in &mut self.tasks {
            let name = task.name();
            task.step(shared).map_err(|err| err.in_task(name))?;
        }
        self.rounds += 1;
        log::trace!("round {} done", self.rounds);
        Ok(())
    }

    /// Run rounds until `done` holds for the session or `max_rounds` pass.
    /// Returns the number of rounds run by this call.
    pub fn run_until(
        &mut self,
        shared: &Shared,
        max_rounds: u64,
        mut done: impl FnMut(&GameState) -> bool,
    ) -> Result<u64, SchedError> {
        let mut ran = 0;
        while ran < max_rounds {
            let finished = {
                let state = shared
                    .lock_sim()
                    .map_err(|source| SchedError::Lock {
                        task: "scheduler",
                        source,
                    })?;
                done(&state)
            };
            if finished {
                break;
            }
            if let Err(err) = self.run_round(shared) {
                log::error!("halting after {} rounds: {err}", self.rounds);
                return Err(err);
            }
            ran += 1;
        }
        Ok(ran)
    }
}
