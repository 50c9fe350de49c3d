//! World Kernel: the running level. Owns runtime objects and agents and
//! advances them one fixed tick at a time.
//!
//! # Invariants
//! - `step` is a pure function of the current state: same state, same result.
//! - saved + killed never exceeds the number of released agents.
//! - Every release, rescue and death is recorded in the event log.

pub mod agent;
pub mod simulation;
pub mod world;

pub use agent::{Agent, AgentState, DeathCause};
pub use simulation::{Simulation, Tally, WorldStepFailure};
pub use world::{World, WorldEvent};
