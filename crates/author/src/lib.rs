//! Level authoring: edit the objects of a level in place, with undo/redo.
//!
//! # Invariants
//! - All edit operations are reversible.
//! - Edits never mutate a descriptor; they swap in a new one.
//! - The session can be written back out at any point.

pub mod editor;

pub use editor::{EditCommand, EditError, EditorSession};
