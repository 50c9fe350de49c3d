//! Session: turns wall-clock frames into fixed simulation ticks and runs a
//! level from start to recorded result.
//!
//! # Invariants
//! - `ticks * tick_duration + leftover` equals all time ever accounted.
//! - No world step happens while paused.
//! - An outcome is emitted and persisted at most once per run.

pub mod clock;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod outcome;
pub mod services;

pub use clock::SimulationClock;
pub use config::SessionConfig;
pub use controller::{SessionController, SessionExit};
pub use driver::{DriverState, Progress, SimulationDriver};
pub use error::{DriverError, ResultStoreError, SessionError};
pub use outcome::Outcome;
pub use services::{MemoryResultStore, ResultStore, SilentSound, SoundSystem};

#[cfg(test)]
pub(crate) mod testing;
