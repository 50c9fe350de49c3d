use glam::Vec2;

use super::{ObjectKind, ParseObject};
use crate::fields::{FieldReader, FieldWriter};
use crate::projection::{EditorShape, PlacementContext, SimulationKind};
use crate::{ContentError, InstantiateError};

/// Animated decoration sprite with optional parallax scrolling.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub(crate) pos: Vec2,
    pub(crate) sprite: String,
    pub(crate) speed: u32,
    pub(crate) parallax: f32,
}

impl Hotspot {
    pub fn new(pos: Vec2, sprite: impl Into<String>, speed: u32, parallax: f32) -> Self {
        Self {
            pos,
            sprite: sprite.into(),
            speed,
            parallax,
        }
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }
}

impl ParseObject for Hotspot {
    const TAG: &'static str = "hotspot";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        let sprite = reader.read_string("sprite")?;
        if sprite.is_empty() {
            return Err(reader.malformed("sprite", "sprite name must not be empty"));
        }
        Ok(Self {
            pos: reader.read_vector("position")?,
            sprite,
            speed: reader.read_u32_or("speed", 0)?,
            parallax: reader.read_f32_or("parallax", 1.0)?,
        })
    }
}

impl ObjectKind for Hotspot {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_string("sprite", &self.sprite);
        out.write_u32("speed", self.speed);
        out.write_f32("parallax", self.parallax);
    }

    fn to_simulation(&self, _ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        Ok(SimulationKind::Animated {
            sprite: self.sprite.clone(),
            speed: self.speed,
            parallax: self.parallax,
            frame: 0,
            elapsed: 0,
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Sprite {
            name: self.sprite.clone(),
        }
    }
}

/// Free-text note for level authors. Invisible and inert while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorMarker {
    pub(crate) pos: Vec2,
    pub(crate) label: String,
}

impl EditorMarker {
    pub fn new(pos: Vec2, label: impl Into<String>) -> Self {
        Self {
            pos,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl ParseObject for EditorMarker {
    const TAG: &'static str = "editor-marker";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        Ok(Self {
            pos: reader.read_vector("position")?,
            label: reader.read_string_or("label", "")?,
        })
    }
}

impl ObjectKind for EditorMarker {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_string("label", &self.label);
    }

    fn to_simulation(&self, _ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        Ok(SimulationKind::Inert)
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Label {
            text: self.label.clone(),
        }
    }
}
