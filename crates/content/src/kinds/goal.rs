use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use plumbfield_common::Rect;

use super::{ObjectKind, ParseObject};
use crate::fields::{FieldReader, FieldWriter};
use crate::projection::{EditorShape, PlacementContext, SimulationKind};
use crate::{ContentError, InstantiateError};

/// Initial walking direction of released agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    /// Alternate, starting with left.
    Misc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "misc" => Ok(Self::Misc),
            other => Err(format!("unknown direction \"{other}\"")),
        }
    }
}

/// Where agents enter the level.
#[derive(Debug, Clone, PartialEq)]
pub struct Entrance {
    pub(crate) pos: Vec2,
    pub(crate) direction: Direction,
    pub(crate) release_rate: u32,
    pub(crate) owner: u32,
}

impl Entrance {
    pub fn new(pos: Vec2, direction: Direction, release_rate: u32, owner: u32) -> Self {
        Self {
            pos,
            direction,
            release_rate,
            owner,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn release_rate(&self) -> u32 {
        self.release_rate
    }
}

impl ParseObject for Entrance {
    const TAG: &'static str = "entrance";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        let direction = reader
            .read_string("direction")?
            .parse()
            .map_err(|reason: String| reader.malformed("direction", reason))?;
        let release_rate = reader.read_u32("release-rate")?;
        if release_rate == 0 {
            return Err(reader.malformed("release-rate", "must be at least 1 tick"));
        }
        Ok(Self {
            pos: reader.read_vector("position")?,
            direction,
            release_rate,
            owner: reader.read_u32_or("owner", 0)?,
        })
    }
}

impl ObjectKind for Entrance {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_string("direction", self.direction.as_str());
        out.write_u32("release-rate", self.release_rate);
        out.write_u32("owner", self.owner);
    }

    fn to_simulation(&self, _ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        Ok(SimulationKind::Entrance {
            direction: self.direction,
            release_rate: self.release_rate,
            owner: self.owner,
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Sprite {
            name: "entrances/generic".into(),
        }
    }
}

/// Goal zone; agents reaching it count as saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Exit {
    pub(crate) pos: Vec2,
    pub(crate) size: Vec2,
    pub(crate) owner: u32,
}

impl Exit {
    pub const DEFAULT_SIZE: Vec2 = Vec2::new(32.0, 32.0);

    pub fn new(pos: Vec2, size: Vec2, owner: u32) -> Self {
        Self { pos, size, owner }
    }

    /// Zone centered on the exit position.
    pub fn zone(&self) -> Rect {
        Rect::from_origin(self.pos - self.size / 2.0, self.size.x, self.size.y)
    }
}

impl ParseObject for Exit {
    const TAG: &'static str = "exit";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        let size = reader.read_vector_or("size", Self::DEFAULT_SIZE)?;
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(reader.malformed("size", "exit size must be positive"));
        }
        Ok(Self {
            pos: reader.read_vector("position")?,
            size,
            owner: reader.read_u32_or("owner", 0)?,
        })
    }
}

impl ObjectKind for Exit {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_vector("size", self.size);
        out.write_u32("owner", self.owner);
    }

    fn to_simulation(&self, _ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        Ok(SimulationKind::Exit {
            zone: self.zone(),
            owner: self.owner,
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Outline { size: self.size }
    }
}
