use std::path::PathBuf;

use plumbfield_kernel::WorldStepFailure;

/// Errors surfaced by [`SimulationDriver::advance`](crate::SimulationDriver::advance).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// The world failed a step. The driver is now `Failed`.
    #[error(transparent)]
    Step(#[from] WorldStepFailure),
}

/// A result store could not record an outcome.
#[derive(Debug, thiserror::Error)]
#[error("could not record result for level `{level}`")]
pub struct ResultStoreError {
    pub level: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ResultStoreError {
    pub fn new(
        level: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            level: level.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed session config: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    ResultStore(#[from] ResultStoreError),
}
