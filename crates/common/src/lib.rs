//! Shared types used across the plumbfield crates.
//!
//! Everything here is plain data: copyable, comparable and serde-serializable.

pub mod types;

pub use glam::Vec2;
pub use types::{Color, ObjectId, Rect, Size};
