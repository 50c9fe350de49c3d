use plumbfield_kernel::{Simulation, WorldStepFailure};

use crate::{DriverError, Outcome, SessionConfig, SimulationClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, never advanced.
    Idle,
    Running,
    Paused,
    FastForwarding,
    /// The world completed; the outcome is recorded.
    Finished,
    /// A world step failed. Terminal.
    Failed,
}

/// What one call to [`SimulationDriver::advance`] achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The level goes on. `ticks` were accounted and `steps` world steps ran.
    Continuing { ticks: u64, steps: u64 },
    Finished(Outcome),
}

/// Drives a [`Simulation`] at a fixed tick rate from variable frame deltas.
#[derive(Debug, Clone)]
pub struct SimulationDriver<W> {
    world: W,
    clock: SimulationClock,
    started: bool,
    outcome: Option<Outcome>,
    failure: Option<WorldStepFailure>,
}

impl<W: Simulation> SimulationDriver<W> {
    /// Driver for `world` in the idle state.
    pub fn new(world: W, config: &SessionConfig) -> Self {
        Self {
            world,
            clock: SimulationClock::from_config(config),
            started: false,
            outcome: None,
            failure: None,
        }
    }

    /// Current lifecycle state, derived from the clock and the outcome.
    pub fn state(&self) -> DriverState {
        if self.failure.is_some() {
            DriverState::Failed
        } else if self.outcome.is_some() {
            DriverState::Finished
        } else if !self.started {
            DriverState::Idle
        } else if self.clock.is_paused() {
            DriverState::Paused
        } else if self.clock.is_fast_forward() {
            DriverState::FastForwarding
        } else {
            DriverState::Running
        }
    }

    /// Account `frame_delta` seconds of wall-clock time and step the world for
    /// every whole tick that completes.
    ///
    /// Once finished, the recorded outcome is returned without stepping. Once
    /// failed, the recorded failure is returned again.
    pub fn advance(&mut self, frame_delta: f32) -> Result<Progress, DriverError> {
        if let Some(outcome) = &self.outcome {
            return Ok(Progress::Finished(outcome.clone()));
        }
        if let Some(failure) = &self.failure {
            return Err(DriverError::Step(failure.clone()));
        }
        let _span = tracing::info_span!("advance", level = self.world.level_id()).entered();
        self.started = true;

        // An aborted world finishes even if no tick completes this frame.
        if self.world.is_complete() {
            return Ok(Progress::Finished(self.finish()));
        }

        let ticks = self.clock.accumulate(frame_delta);
        let steps_per_tick = self.clock.steps_per_tick();
        let mut steps = 0;
        for _ in 0..ticks {
            for _ in 0..steps_per_tick {
                if let Err(failure) = self.world.step() {
                    tracing::error!(error = %failure, "world step failed");
                    self.failure = Some(failure.clone());
                    return Err(DriverError::Step(failure));
                }
                self.clock.record_step();
                steps += 1;
                if self.world.is_complete() {
                    return Ok(Progress::Finished(self.finish()));
                }
            }
        }
        Ok(Progress::Continuing { ticks, steps })
    }

    fn finish(&mut self) -> Outcome {
        let outcome = Outcome::from_tally(self.world.level_id(), &self.world.tally());
        tracing::info!(
            level = %outcome.level_id,
            saved = outcome.saved,
            killed = outcome.killed,
            total = outcome.total,
            ticks = outcome.time_used,
            "level finished"
        );
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Start over with a fresh world. Clock and flags are reset.
    pub fn reset(&mut self, world: W) {
        self.world = world;
        self.clock.reset();
        self.started = false;
        self.outcome = None;
        self.failure = None;
    }

    /// Flip the pause flag.
    pub fn toggle_pause(&mut self) {
        let paused = !self.clock.is_paused();
        self.set_paused(paused);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    /// Flip the fast-forward flag.
    pub fn toggle_fast_forward(&mut self) {
        let fast_forward = !self.clock.is_fast_forward();
        self.set_fast_forward(fast_forward);
    }

    pub fn set_fast_forward(&mut self, fast_forward: bool) {
        self.clock.set_fast_forward(fast_forward);
    }

    /// Ask the world to end; the driver finishes at the next `advance`.
    pub fn request_finish(&mut self) {
        self.world.request_finish();
    }

    /// Start killing the remaining agents.
    pub fn armageddon(&mut self) {
        self.world.armageddon();
    }

    /// The result, once the level has finished.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Time accounting for the session.
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// The world being driven.
    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn into_world(self) -> W {
        self.world
    }
}
