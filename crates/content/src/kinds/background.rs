use glam::Vec2;
use plumbfield_common::{Color, Rect, Size};

use super::{ObjectKind, ParseObject};
use crate::fields::{FieldReader, FieldWriter};
use crate::projection::{EditorShape, PlacementContext, SimulationKind, Star, StarSize};
use crate::{ContentError, InstantiateError};

/// Background that fills the whole viewport with one color.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidColorBackground {
    pub(crate) pos: Vec2,
    pub(crate) color: Color,
}

impl SolidColorBackground {
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self { pos, color }
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl ParseObject for SolidColorBackground {
    const TAG: &'static str = "solidcolor-background";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        Ok(Self {
            pos: reader.read_vector_or("position", Vec2::ZERO)?,
            color: reader.read_color("color")?,
        })
    }
}

impl ObjectKind for SolidColorBackground {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_color("color", self.color);
    }

    fn to_simulation(&self, ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        let viewport = ctx.viewport.ok_or(InstantiateError::IncompatibleContext {
            kind: Self::TAG,
            missing: "viewport",
        })?;
        Ok(SimulationKind::Fill {
            rect: Rect::new(0.0, 0.0, viewport.width as f32, viewport.height as f32),
            color: self.color,
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Swatch {
            color: self.color,
            size: Vec2::new(32.0, 32.0),
        }
    }
}

/// Ambient lightning effect. Carries nothing but its anchor position.
#[derive(Debug, Clone, PartialEq)]
pub struct ThunderstormBackground {
    pub(crate) pos: Vec2,
}

impl ThunderstormBackground {
    /// Ticks between two lightning flashes.
    pub const FLASH_PERIOD: u32 = 250;
    /// Ticks a flash stays visible.
    pub const FLASH_TICKS: u32 = 6;

    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }
}

impl ParseObject for ThunderstormBackground {
    const TAG: &'static str = "thunderstorm-background";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        Ok(Self {
            pos: reader.read_vector_or("position", Vec2::ZERO)?,
        })
    }
}

impl ObjectKind for ThunderstormBackground {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
    }

    fn to_simulation(&self, _ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        Ok(SimulationKind::Thunderstorm {
            period: Self::FLASH_PERIOD,
            flash_ticks: Self::FLASH_TICKS,
            countdown: Self::FLASH_PERIOD,
            lit: 0,
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Sprite {
            name: "editor/thunderstorm".into(),
        }
    }
}

/// Scattered stars over the whole world.
#[derive(Debug, Clone, PartialEq)]
pub struct StarfieldBackground {
    pub(crate) pos: Vec2,
    pub(crate) small_stars: u32,
    pub(crate) middle_stars: u32,
    pub(crate) large_stars: u32,
}

impl StarfieldBackground {
    pub const DEFAULT_SMALL: u32 = 400;
    pub const DEFAULT_MIDDLE: u32 = 200;
    pub const DEFAULT_LARGE: u32 = 100;
    /// Upper bound on each star class.
    pub const MAX_STARS: u32 = 10_000;

    pub fn new(pos: Vec2, small_stars: u32, middle_stars: u32, large_stars: u32) -> Self {
        Self {
            pos,
            small_stars,
            middle_stars,
            large_stars,
        }
    }

    /// Total stars across all three classes.
    pub fn star_count(&self) -> u64 {
        u64::from(self.small_stars) + u64::from(self.middle_stars) + u64::from(self.large_stars)
    }

    fn scatter(&self, world: Size) -> Vec<Star> {
        let classes = [
            (StarSize::Small, self.small_stars),
            (StarSize::Middle, self.middle_stars),
            (StarSize::Large, self.large_stars),
        ];
        let w = u64::from(world.width.max(1));
        let h = u64::from(world.height.max(1));
        let mut stars = Vec::new();
        let mut state = 0x5eed_0000_0000_0000_u64 ^ self.star_count();
        for (size, count) in classes {
            for _ in 0..count {
                state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
                let mut z = state;
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
                z ^= z >> 31;
                let x = (z & 0xffff_ffff) % w;
                let y = (z >> 32) % h;
                stars.push(Star {
                    pos: Vec2::new(x as f32, y as f32),
                    size,
                });
            }
        }
        stars
    }
}

impl ParseObject for StarfieldBackground {
    const TAG: &'static str = "starfield-background";

    fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        let count = |field: &str, default: u32| -> Result<u32, ContentError> {
            let n = reader.read_u32_or(field, default)?;
            if n > Self::MAX_STARS {
                return Err(reader.malformed(
                    field,
                    format!("at most {} stars per class", Self::MAX_STARS),
                ));
            }
            Ok(n)
        };
        Ok(Self {
            pos: reader.read_vector_or("position", Vec2::ZERO)?,
            small_stars: count("small-stars", Self::DEFAULT_SMALL)?,
            middle_stars: count("middle-stars", Self::DEFAULT_MIDDLE)?,
            large_stars: count("large-stars", Self::DEFAULT_LARGE)?,
        })
    }
}

impl ObjectKind for StarfieldBackground {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn write(&self, out: &mut FieldWriter) {
        out.write_vector("position", self.pos);
        out.write_u32("small-stars", self.small_stars);
        out.write_u32("middle-stars", self.middle_stars);
        out.write_u32("large-stars", self.large_stars);
    }

    fn to_simulation(&self, ctx: &PlacementContext) -> Result<SimulationKind, InstantiateError> {
        let world = ctx.world.ok_or(InstantiateError::IncompatibleContext {
            kind: Self::TAG,
            missing: "world",
        })?;
        Ok(SimulationKind::Starfield {
            stars: self.scatter(world),
        })
    }

    fn editor_shape(&self) -> EditorShape {
        EditorShape::Sprite {
            name: "editor/starfield".into(),
        }
    }
}
