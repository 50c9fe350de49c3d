//! Persistence of player progress.
//!
//! # Invariants
//! - One record per level, only ever replaced by a better one.
//! - A finished level is never downgraded.
//! - The savegame file is verified against its digest before it is trusted.

pub mod savegame;
pub mod store;

pub use savegame::{Savegame, SavegameStatus};
pub use store::{SavegameError, SavegameStore};
