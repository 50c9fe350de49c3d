use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Tunables for a level session.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Wall-clock milliseconds per simulation tick.
    pub tick_duration_ms: u32,
    /// World steps per tick while fast-forwarding.
    pub fast_forward_multiplier: u32,
    /// Whether a finished session shows its result or returns straight away.
    pub show_result_screen: bool,
    /// Seed for the world's deterministic randomness.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: 20,
            fast_forward_multiplier: 4,
            show_result_screen: true,
            seed: 0,
        }
    }
}

impl SessionConfig {
    pub fn with_tick_duration_ms(mut self, ms: u32) -> Self {
        self.tick_duration_ms = ms;
        self
    }

    pub fn with_fast_forward_multiplier(mut self, multiplier: u32) -> Self {
        self.fast_forward_multiplier = multiplier;
        self
    }

    pub fn with_result_screen(mut self, show: bool) -> Self {
        self.show_result_screen = show;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.tick_duration_ms == 0 {
            return Err(SessionError::InvalidConfig {
                field: "tick_duration_ms",
                reason: "must be at least 1".into(),
            });
        }
        if self.fast_forward_multiplier == 0 {
            return Err(SessionError::InvalidConfig {
                field: "fast_forward_multiplier",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Parse and validate a YAML config.
    pub fn from_yaml_str(text: &str) -> Result<Self, SessionError> {
        let config = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_timing() {
        let c = SessionConfig::default();
        assert_eq!(c.tick_duration_ms, 20);
        assert_eq!(c.fast_forward_multiplier, 4);
        assert!(c.show_result_screen);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let c = SessionConfig::from_yaml_str("fast_forward_multiplier: 8\nseed: 99\n").unwrap();
        assert_eq!(c.fast_forward_multiplier, 8);
        assert_eq!(c.seed, 99);
        assert_eq!(c.tick_duration_ms, 20);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(
            SessionConfig::from_yaml_str("").unwrap(),
            SessionConfig::default()
        );
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let err = SessionConfig::from_yaml_str("tick_duration_ms: 0\n").unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidConfig {
                field: "tick_duration_ms",
                ..
            }
        ));
        let err = SessionConfig::default()
            .with_fast_forward_multiplier(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidConfig {
                field: "fast_forward_multiplier",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(matches!(
            SessionConfig::from_yaml_str("tick_rate: 5\n"),
            Err(SessionError::ConfigFormat(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");
        std::fs::write(&path, "tick_duration_ms: 10\nshow_result_screen: false\n").unwrap();
        let c = SessionConfig::load(&path).unwrap();
        assert_eq!(c, SessionConfig::default().with_tick_duration_ms(10).with_result_screen(false));

        let missing = SessionConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, SessionError::ConfigIo { .. }));
    }
}
