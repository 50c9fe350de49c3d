use std::sync::Arc;

use plumbfield_common::Size;

use crate::fields::{FieldReader, FieldWriter};
use crate::{ContentError, WorldObjectDescriptor};

/// Level-wide settings stored under the `level` key.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelHeader {
    /// Stable identifier, also the key for saved progress.
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub world: Size,
    /// Agents released over the course of the level.
    pub agents: u32,
    /// Agents that must be saved to finish the level.
    pub required: u32,
    /// Time limit in ticks; `None` for unlimited.
    pub time_limit: Option<u32>,
    /// Music track name, or `none` for silence.
    pub music: String,
}

impl LevelHeader {
    pub const NO_MUSIC: &'static str = "none";

    pub fn new(id: impl Into<String>, world: Size, agents: u32, required: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            author: String::new(),
            world,
            agents,
            required,
            time_limit: None,
            music: Self::NO_MUSIC.into(),
        }
    }

    pub(crate) fn read(reader: &FieldReader<'_>) -> Result<Self, ContentError> {
        let id = reader.read_string("id")?;
        if id.is_empty() {
            return Err(reader.malformed("id", "level id must not be empty"));
        }
        let agents = reader.read_u32("agents")?;
        let required = reader.read_u32("required")?;
        if required > agents {
            return Err(reader.malformed(
                "required",
                format!("requires {required} saved agents but only {agents} are released"),
            ));
        }
        let time_limit = if reader.has("time-limit") {
            Some(reader.read_u32("time-limit")?)
        } else {
            None
        };
        Ok(Self {
            id,
            name: reader.read_string_or("name", "")?,
            description: reader.read_string_or("description", "")?,
            author: reader.read_string_or("author", "")?,
            world: Size::new(reader.read_u32("width")?, reader.read_u32("height")?),
            agents,
            required,
            time_limit,
            music: reader.read_string_or("music", Self::NO_MUSIC)?,
        })
    }

    pub(crate) fn write(&self) -> serde_yaml::Value {
        let mut out = FieldWriter::untagged();
        out.write_string("id", &self.id);
        out.write_string("name", &self.name);
        out.write_string("description", &self.description);
        out.write_string("author", &self.author);
        out.write_u32("width", self.world.width);
        out.write_u32("height", self.world.height);
        out.write_u32("agents", self.agents);
        out.write_u32("required", self.required);
        if let Some(limit) = self.time_limit {
            out.write_u32("time-limit", limit);
        }
        out.write_string("music", &self.music);
        out.finish()
    }
}

/// A whole level: header plus objects in draw order.
///
/// Objects are shared read-only handles so the same descriptors can back a
/// simulation and an open editor at once.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDocument {
    pub header: LevelHeader,
    pub objects: Vec<Arc<WorldObjectDescriptor>>,
}

impl LevelDocument {
    pub fn new(header: LevelHeader) -> Self {
        Self {
            header,
            objects: Vec::new(),
        }
    }

    pub fn with_objects<I>(header: LevelHeader, objects: I) -> Self
    where
        I: IntoIterator<Item = WorldObjectDescriptor>,
    {
        Self {
            header,
            objects: objects.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn push(&mut self, object: impl Into<WorldObjectDescriptor>) {
        self.objects.push(Arc::new(object.into()));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects with the given tag.
    pub fn count_of(&self, tag: &str) -> usize {
        self.objects.iter().filter(|o| o.tag() == tag).count()
    }
}
