//! The built-in object kinds and the capability traits every kind implements.

mod background;
mod decoration;
mod goal;
mod hazard;

pub use background::{SolidColorBackground, StarfieldBackground, ThunderstormBackground};
pub use decoration::{EditorMarker, Hotspot};
pub use goal::{Direction, Entrance, Exit};
pub use hazard::Liquid;

use glam::Vec2;

use crate::fields::{FieldReader, FieldWriter};
use crate::projection::{EditorShape, PlacementContext, SimulationKind};
use crate::{ContentError, InstantiateError};

/// Per-kind capabilities that do not depend on the concrete type.
///
/// Together with [`ParseObject::read`] this is the full capability set of a
/// kind: parse, serialize, project for simulation, project for the editor.
pub trait ObjectKind {
    /// Canonical type tag written to level documents.
    fn tag(&self) -> &'static str;

    fn position(&self) -> Vec2;

    /// Write every field that `read` consumes. The `type` key is already set.
    fn write(&self, out: &mut FieldWriter);

    fn to_simulation(&self, ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError>;

    fn editor_shape(&self) -> EditorShape;
}

/// Kinds that can be constructed from a level-document node.
pub trait ParseObject: ObjectKind + Sized + Into<WorldObjectDescriptor> {
    const TAG: &'static str;

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError>;
}

/// One parsed level object.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldObjectDescriptor {
    SolidColorBackground(SolidColorBackground),
    ThunderstormBackground(ThunderstormBackground),
    StarfieldBackground(StarfieldBackground),
    Hotspot(Hotspot),
    EditorMarker(EditorMarker),
    Entrance(Entrance),
    Exit(Exit),
    Liquid(Liquid),
}

impl WorldObjectDescriptor {
    pub fn kind(&self) -> &dyn ObjectKind {
        match self {
            Self::SolidColorBackground(k) => k,
            Self::ThunderstormBackground(k) => k,
            Self::StarfieldBackground(k) => k,
            Self::Hotspot(k) => k,
            Self::EditorMarker(k) => k,
            Self::Entrance(k) => k,
            Self::Exit(k) => k,
            Self::Liquid(k) => k,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    pub fn position(&self) -> Vec2 {
        self.kind().position()
    }

    /// A copy of this descriptor placed at `pos`.
    pub fn with_position(&self, pos: Vec2) -> Self {
        let mut copy = self.clone();
        match &mut copy {
            Self::SolidColorBackground(k) => k.pos = pos,
            Self::ThunderstormBackground(k) => k.pos = pos,
            Self::StarfieldBackground(k) => k.pos = pos,
            Self::Hotspot(k) => k.pos = pos,
            Self::EditorMarker(k) => k.pos = pos,
            Self::Entrance(k) => k.pos = pos,
            Self::Exit(k) => k.pos = pos,
            Self::Liquid(k) => k.pos = pos,
        }
        copy
    }

    pub(crate) fn write(&self) -> serde_yaml::Value {
        let kind = self.kind();
        let mut out = FieldWriter::object(kind.tag());
        kind.write(&mut out);
        out.finish()
    }
}

macro_rules! descriptor_from {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for WorldObjectDescriptor {
                fn from(k: $kind) -> Self {
                    Self::$kind(k)
                }
            }
        )*
    };
}

descriptor_from!(
    SolidColorBackground,
    ThunderstormBackground,
    StarfieldBackground,
    Hotspot,
    EditorMarker,
    Entrance,
    Exit,
    Liquid,
);
