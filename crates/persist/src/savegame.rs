use plumbfield_session::Outcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavegameStatus {
    /// Playable but not yet solved.
    Accessible,
    /// Solved at least once.
    Finished,
}

/// The best known result for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savegame {
    pub level_id: String,
    pub status: SavegameStatus,
    /// Ticks the recorded run took.
    pub time_used: u64,
    pub saved: u32,
}

impl Savegame {
    /// Unlocked level with no result yet.
    pub fn accessible(level_id: impl Into<String>) -> Self {
        Self {
            level_id: level_id.into(),
            status: SavegameStatus::Accessible,
            time_used: 0,
            saved: 0,
        }
    }

    /// Record for a finished run; solved if enough agents were saved.
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let status = if outcome.succeeded() {
            SavegameStatus::Finished
        } else {
            SavegameStatus::Accessible
        };
        Self {
            level_id: outcome.level_id.clone(),
            status,
            time_used: outcome.time_used,
            saved: outcome.saved,
        }
    }

    /// Finished beats accessible, then more saved, then less time.
    pub fn is_better_than(&self, other: &Savegame) -> bool {
        let key = |s: &Savegame| (s.status, s.saved, std::cmp::Reverse(s.time_used));
        key(self) > key(other)
    }
}
