//! Drawing adapter: the abstract "draw" capability consumed by the game core.
//!
//! # Invariants
//! - Drawing never mutates simulation state.
//! - The core only talks to [`DrawingContext`]; concrete backends live elsewhere.

mod draw;
mod playfield;

pub use draw::{DrawCommand, DrawList, DrawingContext};
pub use playfield::Playfield;
