//! Capabilities a session is given rather than owns.

use crate::{Outcome, ResultStoreError};

/// Records the result of a completed level.
///
/// Called exactly once per completed session.
pub trait ResultStore {
    fn persist(&mut self, outcome: &Outcome) -> Result<(), ResultStoreError>;
}

/// Background music control.
pub trait SoundSystem {
    fn play_music(&mut self, track: &str);
    fn stop_music(&mut self);
}

/// Keeps outcomes in memory, in completion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    records: Vec<Outcome>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Outcome] {
        &self.records
    }
}

impl ResultStore for MemoryResultStore {
    fn persist(&mut self, outcome: &Outcome) -> Result<(), ResultStoreError> {
        self.records.push(outcome.clone());
        Ok(())
    }
}

/// A sound system for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSound;

impl SoundSystem for SilentSound {
    fn play_music(&mut self, track: &str) {
        tracing::debug!(track, "music requested (silent)");
    }

    fn stop_music(&mut self) {}
}
