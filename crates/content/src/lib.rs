//! Level content: the object kinds that populate a level, how they are read
//! from and written to a level document, and how they turn into runtime
//! objects.
//!
//! # Invariants
//! - Descriptors are immutable; edits produce new descriptors.
//! - parse → serialize → parse reproduces every descriptor and its order.
//! - Runtime projections are built only through [`RuntimeInstantiator`].

pub mod document;
pub mod error;
pub mod factory;
pub mod fields;
pub mod instantiate;
pub mod kinds;
pub mod projection;

pub use document::{LevelDocument, LevelHeader};
pub use error::{ContentError, InstantiateError};
pub use factory::{ContentFactory, LoadReport};
pub use fields::{FieldReader, FieldWriter};
pub use instantiate::{Instantiated, RuntimeInstantiator};
pub use kinds::{
    Direction, EditorMarker, Entrance, Exit, Hotspot, Liquid, ObjectKind, ParseObject,
    SolidColorBackground, StarfieldBackground, ThunderstormBackground, WorldObjectDescriptor,
};
pub use projection::{
    EditorObject, EditorShape, PlacementContext, SimulationKind, SimulationObject, Star, StarSize,
};
