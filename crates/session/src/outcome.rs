use plumbfield_kernel::Tally;
use serde::{Deserialize, Serialize};

/// The recorded result of one completed level run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub level_id: String,
    pub saved: u32,
    pub killed: u32,
    pub total: u32,
    pub required: u32,
    /// Time limit in ticks, if the level had one.
    pub time_limit: Option<u32>,
    /// Ticks simulated until completion.
    pub time_used: u64,
}

impl Outcome {
    pub fn from_tally(level_id: impl Into<String>, tally: &Tally) -> Self {
        Self {
            level_id: level_id.into(),
            saved: tally.saved,
            killed: tally.killed,
            total: tally.total,
            required: tally.required,
            time_limit: tally.time_limit,
            time_used: tally.ticks,
        }
    }

    /// Enough agents were saved to pass the level.
    pub fn succeeded(&self) -> bool {
        self.saved >= self.required
    }
}
