use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A command a player can issue while a level is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Flip the paused flag.
    TogglePause,
    SetPause(bool),
    /// Flip fast-forward.
    ToggleFastForward,
    SetFastForward(bool),
    /// End the level now; the result is still recorded.
    Abort,
    /// Start the level over from its initial state.
    Restart,
    /// Kill off every walking agent.
    Armageddon,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}`")]
pub struct ParseActionError(pub String);

impl Action {
    /// Short name used in scripts and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::TogglePause => "pause",
            Action::SetPause(true) => "pause-on",
            Action::SetPause(false) => "pause-off",
            Action::ToggleFastForward => "fast-forward",
            Action::SetFastForward(true) => "fast-forward-on",
            Action::SetFastForward(false) => "fast-forward-off",
            Action::Abort => "abort",
            Action::Restart => "restart",
            Action::Armageddon => "armageddon",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim() {
            "pause" => Action::TogglePause,
            "pause-on" => Action::SetPause(true),
            "pause-off" => Action::SetPause(false),
            "fast-forward" | "ff" => Action::ToggleFastForward,
            "fast-forward-on" => Action::SetFastForward(true),
            "fast-forward-off" => Action::SetFastForward(false),
            "abort" => Action::Abort,
            "restart" => Action::Restart,
            "armageddon" => Action::Armageddon,
            other => return Err(ParseActionError(other.to_string())),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        let all = [
            Action::TogglePause,
            Action::SetPause(true),
            Action::SetPause(false),
            Action::ToggleFastForward,
            Action::SetFastForward(true),
            Action::SetFastForward(false),
            Action::Abort,
            Action::Restart,
            Action::Armageddon,
        ];
        for action in all {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn short_alias_and_whitespace() {
        assert_eq!(" ff ".parse::<Action>(), Ok(Action::ToggleFastForward));
    }

    #[test]
    fn unknown_action_rejected() {
        let err = "jump".parse::<Action>().unwrap_err();
        assert_eq!(err, ParseActionError("jump".into()));
        assert_eq!(err.to_string(), "unknown action `jump`");
    }
}
