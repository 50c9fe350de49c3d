use serde::{Deserialize, Serialize};

/// Counts a finished (or running) level is judged by.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub saved: u32,
    pub killed: u32,
    pub total: u32,
    pub required: u32,
    /// Time limit in ticks, if the level has one.
    pub time_limit: Option<u32>,
    /// Ticks simulated so far.
    pub ticks: u64,
}

/// The world broke one of its own invariants during a step.
///
/// Fatal for the session; the step is not retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldStepFailure {
    #[error("world invariant violated at tick {tick}: {detail}")]
    InvariantViolated { tick: u64, detail: String },
}

/// What a driver needs from a steppable world.
pub trait Simulation {
    /// Advance exactly one fixed-duration tick.
    fn step(&mut self) -> Result<(), WorldStepFailure>;

    fn is_complete(&self) -> bool;

    fn tally(&self) -> Tally;

    fn level_id(&self) -> &str;

    /// End the level at the next completion check (abort).
    fn request_finish(&mut self);

    /// Kill off every agent still walking.
    fn armageddon(&mut self);
}
