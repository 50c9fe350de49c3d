use glam::Vec2;
use plumbfield_common::Rect;

use super::{ObjectKind, ParseObject};
use crate::fields::{FieldReader, FieldWriter};
use crate::projection::{EditorShape, PlacementContext, SimulationKind};
use crate::{ContentError, InstantiateError};

/// Deadly liquid surface (water, lava, ...) spanning `width` units to the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Liquid {
    pub(crate) pos: Vec2,
    pub(crate) width: u32,
    pub(crate) sprite: String,
    pub(crate) speed: u32,
}

impl Liquid {
    /// Vertical reach of the surface above and below its position.
    pub const REACH: f32 = 16.0;

    pub fn new(pos: Vec2, width: u32, sprite: impl Into<String>, speed: u32) -> Self {
        Self {
            pos,
            width,
            sprite: sprite.into(),
            speed,
        }
    }

    pub fn zone(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y - Self::REACH,
            self.pos.x + self.width as f32,
            self.pos.y + Self::REACH,
        )
    }
}

impl ParseObject for Liquid {
    const TAG: &'static str = "liquid";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        let width = reader.read_u32("width")?;
        if width == 0 {
            return Err(reader.malformed("width", "liquid must be at least 1 unit wide"));
        }
        Ok(Self {
            pos: reader.read_vector("position")?,
            width,
            sprite: reader.read_string_or("sprite", "liquids/water")?,
            speed: reader.read_u32_or("speed", 20)?,
        })
    }
}

impl ObjectKind for Liquid {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_u32("width", self.width);
        out.write_string("sprite", &self.sprite);
        out.write_u32("speed", self.speed);
    }

    fn to_simulation(&self, _ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        Ok(SimulationKind::Liquid {
            zone: self.zone(),
            sprite: self.sprite.clone(),
            speed: self.speed,
            frame: 0,
            elapsed: 0,
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Outline {
            size: Vec2::new(self.width as f32, Self::REACH * 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_spans_width_and_reach() {
        let l = Liquid::new(Vec2::new(10.0, 100.0), 40, "liquids/lava", 5);
        let zone = l.zone();
        assert_eq!(zone.left, 10.0);
        assert_eq!(zone.right, 50.0);
        assert!(zone.contains(Vec2::new(20.0, 100.0)));
        assert!(!zone.contains(Vec2::new(20.0, 140.0)));
    }
}
