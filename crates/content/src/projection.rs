//! Runtime projections of a descriptor: what the simulation ticks and what
//! the editor manipulates.

use std::sync::Arc;

use glam::Vec2;
use plumbfield_common::{Color, ObjectId, Rect, Size};

use crate::kinds::{Direction, WorldObjectDescriptor};

/// Placement information injected into instantiation.
///
/// Some kinds derive their layout from the viewport or the world extent and
/// refuse to instantiate without it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementContext {
    pub viewport: Option<Size>,
    pub world: Option<Size>,
}

impl PlacementContext {
    pub fn new(viewport: Size, world: Size) -> Self {
        Self {
            viewport: Some(viewport),
            world: Some(world),
        }
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_world(mut self, world: Size) -> Self {
        self.world = Some(world);
        self
    }
}

/// Relative size of a background star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarSize {
    Small,
    Middle,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: StarSize,
}

/// Per-kind runtime state of a simulation object.
///
/// Counters in here are advanced by the world once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationKind {
    /// Solid fill behind everything else.
    Fill { rect: Rect, color: Color },
    /// Lightning flashes every `period` ticks and stays lit for `flash_ticks`.
    Thunderstorm {
        period: u32,
        flash_ticks: u32,
        countdown: u32,
        lit: u32,
    },
    Starfield { stars: Vec<Star> },
    /// Looping sprite animation; the frame advances every `speed` ticks.
    Animated {
        sprite: String,
        speed: u32,
        parallax: f32,
        frame: u32,
        elapsed: u32,
    },
    Entrance {
        direction: Direction,
        release_rate: u32,
        owner: u32,
    },
    Exit { zone: Rect, owner: u32 },
    Liquid {
        zone: Rect,
        sprite: String,
        speed: u32,
        frame: u32,
        elapsed: u32,
    },
    /// No simulation behaviour (editor-only kinds).
    Inert,
}

/// A level object as owned by the running simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationObject {
    tag: &'static str,
    pos: Vec2,
    kind: SimulationKind,
}

impl SimulationObject {
    pub(crate) fn new(tag: &'static str, pos: Vec2, kind: SimulationKind) -> Self {
        Self { tag, pos, kind }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn kind(&self) -> &SimulationKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut SimulationKind {
        &mut self.kind
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.kind, SimulationKind::Inert)
    }
}

/// How an object is shown and picked in the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorShape {
    Swatch { color: Color, size: Vec2 },
    Sprite { name: String },
    Outline { size: Vec2 },
    Label { text: String },
}

impl EditorShape {
    const SPRITE_EXTENT: Vec2 = Vec2::new(32.0, 32.0);

    pub fn extent(&self) -> Vec2 {
        match self {
            Self::Swatch { size, .. } | Self::Outline { size } => *size,
            Self::Sprite { .. } => Self::SPRITE_EXTENT,
            Self::Label { text } => Vec2::new(8.0 * text.chars().count().max(1) as f32, 12.0),
        }
    }
}

/// A level object as placed in an editor session.
///
/// Holds a shared handle to the immutable descriptor it was built from so the
/// level can be re-serialized at any time. Editing swaps in a new descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorObject {
    id: ObjectId,
    source: Arc<WorldObjectDescriptor>,
    shape: EditorShape,
}

impl EditorObject {
    pub(crate) fn new(id: ObjectId, source: Arc<WorldObjectDescriptor>, shape: EditorShape) -> Self {
        Self { id, source, shape }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn descriptor(&self) -> &Arc<WorldObjectDescriptor> {
        &self.source
    }

    pub fn pos(&self) -> Vec2 {
        self.source.position()
    }

    pub fn shape(&self) -> &EditorShape {
        &self.shape
    }

    /// Picking rectangle in world coordinates.
    pub fn bounds(&self) -> Rect {
        let extent = self.shape.extent();
        Rect::from_origin(self.pos(), extent.x, extent.y)
    }

    /// The same editor object, rebuilt around a replacement descriptor.
    /// The id is kept so undo/redo can find it again.
    pub fn rebased(&self, source: Arc<WorldObjectDescriptor>) -> Self {
        let shape = source.kind().editor_shape();
        Self {
            id: self.id,
            source,
            shape,
        }
    }
}
