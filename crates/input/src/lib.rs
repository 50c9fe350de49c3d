//! Player commands: the only way input reaches a running session.
//!
//! # Invariants
//! - Front ends translate their raw events into [`Action`]s; the session never
//!   sees keys or buttons.

pub mod action;

pub use action::{Action, ParseActionError};
