//! Level document loading and saving.
//!
//! A document looks like:
//! ```yaml
//! level:
//!   id: tutorial-01
//!   width: 800
//!   height: 600
//!   agents: 10
//!   required: 5
//! objects:
//!   - type: solidcolor-background
//!     color: { red: 0.1, green: 0.1, blue: 0.3 }
//!   - type: exit
//!     position: { x: 700, y: 500 }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_yaml::{Mapping, Value};

use crate::fields::FieldReader;
use crate::kinds::{
    EditorMarker, Entrance, Exit, Hotspot, Liquid, ParseObject, SolidColorBackground,
    StarfieldBackground, ThunderstormBackground, WorldObjectDescriptor,
};
use crate::{ContentError, LevelDocument, LevelHeader};

/// Kind name used in diagnostics for nodes that have no usable type tag.
const UNTYPED: &str = "<untyped>";

type ParseFn = fn(&FieldReader<'_>) -> Result<WorldObjectDescriptor, ContentError>;

#[derive(Clone, Copy)]
struct KindEntry {
    canonical: &'static str,
    parse: ParseFn,
}

fn parse_kind<K: ParseObject>(reader: &FieldReader<'_>) -> Result<WorldObjectDescriptor, ContentError> {
    K::read(reader).map(Into::into)
}

/// Result of loading a level: whatever could be parsed plus every per-object
/// problem found along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub document: LevelDocument,
    pub diagnostics: Vec<ContentError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Registry of object kinds keyed by type tag.
#[derive(Clone)]
pub struct ContentFactory {
    kinds: BTreeMap<String, KindEntry>,
}

impl ContentFactory {
    /// Factory that knows no kinds at all.
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Factory with every built-in kind and the legacy tag aliases.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register::<SolidColorBackground>();
        factory.register::<ThunderstormBackground>();
        factory.register::<StarfieldBackground>();
        factory.register::<Hotspot>();
        factory.register::<EditorMarker>();
        factory.register::<Entrance>();
        factory.register::<Exit>();
        factory.register::<Liquid>();

        factory.register_alias("solidcolor", SolidColorBackground::TAG);
        factory.register_alias("thunderstorm", ThunderstormBackground::TAG);
        factory.register_alias("starfield", StarfieldBackground::TAG);
        factory
    }

    /// Register a kind under its canonical tag, replacing any previous entry.
    pub fn register<K: ParseObject>(&mut self) {
        self.kinds.insert(
            K::TAG.to_string(),
            KindEntry {
                canonical: K::TAG,
                parse: parse_kind::<K>,
            },
        );
    }

    /// Accept `alias` as another spelling of an already registered tag.
    /// Returns `false` if `canonical` is unknown.
    pub fn register_alias(&mut self, alias: impl Into<String>, canonical: &str) -> bool {
        let Some(entry) = self.kinds.get(canonical).copied() else {
            return false;
        };
        self.kinds.insert(alias.into(), entry);
        true
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }

    /// All accepted tags, aliases included, in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Parse a level document.
    ///
    /// Unknown or malformed objects are skipped and reported in the returned
    /// diagnostics; only document-level problems fail the whole load.
    pub fn parse(&self, source: &str) -> Result<LoadReport, ContentError> {
        let _span = tracing::info_span!("load_level").entered();

        let root: Value = serde_yaml::from_str(source)?;
        let root = root
            .as_mapping()
            .ok_or_else(|| ContentError::Document("root must be a mapping".into()))?;

        let header = root
            .get("level")
            .and_then(Value::as_mapping)
            .ok_or_else(|| ContentError::Document("missing `level` header mapping".into()))?;
        let header = LevelHeader::read(&FieldReader::header(header))?;

        let nodes: &[Value] = match root.get("objects") {
            Some(Value::Sequence(seq)) => seq.as_slice(),
            Some(Value::Null) | None => &[],
            Some(_) => {
                return Err(ContentError::Document(
                    "`objects` must be a sequence".into(),
                ));
            }
        };

        let mut document = LevelDocument::new(header);
        let mut diagnostics = Vec::new();
        for (node, value) in nodes.iter().enumerate() {
            match self.parse_object(node, value) {
                Ok(object) => {
                    tracing::debug!(node, tag = object.tag(), "parsed level object");
                    document.objects.push(Arc::new(object));
                }
                Err(err) => {
                    tracing::warn!(node, error = %err, "skipping level object");
                    diagnostics.push(err);
                }
            }
        }

        tracing::info!(
            level = %document.header.id,
            objects = document.len(),
            skipped = diagnostics.len(),
            "level loaded"
        );
        Ok(LoadReport {
            document,
            diagnostics,
        })
    }

    /// Parse a single object node. `node` is its index in the `objects` list.
    pub fn parse_object(
        &self,
        node: usize,
        value: &Value,
    ) -> Result<WorldObjectDescriptor, ContentError> {
        let untyped = |reason: &str| ContentError::MalformedField {
            kind: UNTYPED.to_string(),
            field: "type".to_string(),
            node,
            reason: reason.to_string(),
        };
        let map: &Mapping = value
            .as_mapping()
            .ok_or_else(|| untyped("object node must be a mapping"))?;
        let tag = map
            .get("type")
            .ok_or_else(|| untyped("missing required field"))?
            .as_str()
            .ok_or_else(|| untyped("type tag must be a string"))?;
        let entry = self
            .kinds
            .get(tag)
            .ok_or_else(|| ContentError::UnknownObjectKind {
                tag: tag.to_string(),
                node,
            })?;
        (entry.parse)(&FieldReader::object(entry.canonical, node, map))
    }

    /// Write a level document. Objects keep their order; every tag is written
    /// in its canonical form.
    pub fn serialize(&self, document: &LevelDocument) -> Result<String, ContentError> {
        let mut root = Mapping::new();
        root.insert("level".into(), document.header.write());
        let objects = document.objects.iter().map(|o| o.write()).collect();
        root.insert("objects".into(), Value::Sequence(objects));
        Ok(serde_yaml::to_string(&Value::Mapping(root))?)
    }
}

impl Default for ContentFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContentFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentFactory")
            .field("tags", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;
    use glam::Vec2;
    use plumbfield_common::{Color, Size};
    use proptest::prelude::*;

    const LEVEL: &str = r#"
level:
  id: tutorial-01
  name: First steps
  width: 800
  height: 600
  agents: 10
  required: 5
  time-limit: 3000
  music: cavern
objects:
  - type: solidcolor-background
    color: { red: 0.1, green: 0.2, blue: 0.3 }
  - type: foo
    position: { x: 1, y: 2 }
  - type: entrance
    position: { x: 100, y: 400 }
    direction: right
    release-rate: 50
  - type: exit
    position: { x: 700 }
  - type: exit
    position: { x: 700, y: 400 }
  - type: thunderstorm
    position: { x: 0, y: 0 }
"#;

    #[test]
    fn load_skips_bad_objects_and_reports_them() {
        let report = ContentFactory::new().parse(LEVEL).unwrap();
        let doc = &report.document;

        assert_eq!(doc.header.id, "tutorial-01");
        assert_eq!(doc.header.time_limit, Some(3000));
        assert_eq!(doc.len(), 4);
        assert_eq!(
            doc.objects.iter().map(|o| o.tag()).collect::<Vec<_>>(),
            vec![
                "solidcolor-background",
                "entrance",
                "exit",
                "thunderstorm-background"
            ]
        );

        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(
            report.diagnostics[0],
            ContentError::UnknownObjectKind {
                tag: "foo".into(),
                node: 1
            }
        );
        match &report.diagnostics[1] {
            ContentError::MalformedField {
                kind, field, node, ..
            } => {
                assert_eq!(kind, "exit");
                assert_eq!(field, "position");
                assert_eq!(*node, 3);
            }
            other => panic!("expected MalformedField, got {other:?}"),
        }
    }

    #[test]
    fn untyped_and_non_mapping_nodes_are_malformed() {
        let src = "level: { id: x, width: 1, height: 1, agents: 0, required: 0 }\nobjects:\n  - 42\n  - { position: { x: 0, y: 0 } }\n  - { type: 7 }\n";
        let report = ContentFactory::new().parse(src).unwrap();
        assert!(report.document.is_empty());
        assert_eq!(report.diagnostics.len(), 3);
        assert!(report.diagnostics.iter().all(|d| matches!(
            d,
            ContentError::MalformedField { kind, field, .. } if kind == UNTYPED && field == "type"
        )));
    }

    #[test]
    fn document_level_problems_are_fatal() {
        let f = ContentFactory::new();
        assert!(matches!(f.parse("- just\n- a list\n"), Err(ContentError::Document(_))));
        assert!(matches!(f.parse("objects: []\n"), Err(ContentError::Document(_))));
        assert!(matches!(
            f.parse("level: { id: x, width: 1, height: 1, agents: 0, required: 0 }\nobjects: 3\n"),
            Err(ContentError::Document(_))
        ));
        assert!(matches!(
            f.parse("level: { id: x, width: wide, height: 1, agents: 0, required: 0 }\n"),
            Err(ContentError::MalformedHeader { .. })
        ));
        assert!(matches!(f.parse("level: [unclosed\n"), Err(ContentError::Document(_))));
    }

    #[test]
    fn missing_objects_list_means_empty_level() {
        let report = ContentFactory::new()
            .parse("level: { id: x, width: 1, height: 1, agents: 0, required: 0 }\n")
            .unwrap();
        assert!(report.is_clean());
        assert!(report.document.is_empty());
    }

    #[test]
    fn legacy_tags_serialize_canonically() {
        let f = ContentFactory::new();
        let report = f.parse(LEVEL).unwrap();
        let text = f.serialize(&report.document).unwrap();
        assert!(text.contains("type: thunderstorm-background"));
        assert!(!text.contains("type: thunderstorm\n"));
    }

    #[test]
    fn round_trip_preserves_loaded_level() {
        let f = ContentFactory::new();
        let first = f.parse(LEVEL).unwrap().document;
        let text = f.serialize(&first).unwrap();
        let second = f.parse(&text).unwrap();
        assert!(second.is_clean());
        assert_eq!(second.document, first);
    }

    #[test]
    fn unrepresentable_objects_are_dropped_at_first_load() {
        let f = ContentFactory::new();
        let src = "level: { id: x, width: 100, height: 100, agents: 0, required: 0 }\nobjects:\n  - { type: editor-marker, position: { x: 1.0e39, y: 0 } }\n  - { type: starfield-background, small-stars: 4000000000, middle-stars: 300000000 }\n  - { type: exit, position: { x: 3, y: 4 } }\n";
        let report = f.parse(src).unwrap();
        assert_eq!(report.document.len(), 1);
        assert_eq!(report.diagnostics.len(), 2);

        let text = f.serialize(&report.document).unwrap();
        assert!(!text.contains(".inf"));
        let again = f.parse(&text).unwrap();
        assert!(again.is_clean());
        assert_eq!(again.document, report.document);
    }

    #[test]
    fn empty_factory_knows_nothing_until_registered() {
        let mut f = ContentFactory::empty();
        assert!(!f.is_registered(Exit::TAG));
        assert!(!f.register_alias("goal", Exit::TAG));

        f.register::<Exit>();
        assert!(f.register_alias("goal", Exit::TAG));
        let value: Value = serde_yaml::from_str("{ type: goal, position: { x: 1, y: 1 } }").unwrap();
        let object = f.parse_object(0, &value).unwrap();
        assert_eq!(object.tag(), Exit::TAG);
        assert_eq!(f.tags().collect::<Vec<_>>(), vec!["exit", "goal"]);
    }

    fn coord() -> impl Strategy<Value = f32> {
        -2000.0f32..2000.0
    }

    fn position() -> impl Strategy<Value = Vec2> {
        (coord(), coord()).prop_map(|(x, y)| Vec2::new(x, y))
    }

    fn color() -> impl Strategy<Value = Color> {
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0)
            .prop_map(|(r, g, b, a)| Color::rgba(r, g, b, a))
    }

    fn descriptor() -> impl Strategy<Value = WorldObjectDescriptor> {
        prop_oneof![
            (position(), color()).prop_map(|(p, c)| WorldObjectDescriptor::from(SolidColorBackground::new(p, c))),
            position().prop_map(|p| WorldObjectDescriptor::from(ThunderstormBackground::new(p))),
            (position(), 0u32..500, 0u32..500, 0u32..500)
                .prop_map(|(p, s, m, l)| WorldObjectDescriptor::from(StarfieldBackground::new(p, s, m, l))),
            (position(), "[a-z/]{1,12}", 0u32..10, -2.0f32..2.0)
                .prop_map(|(p, s, speed, px)| WorldObjectDescriptor::from(Hotspot::new(p, s, speed, px))),
            (position(), "[ -~]{0,20}")
                .prop_map(|(p, l)| WorldObjectDescriptor::from(EditorMarker::new(p, l))),
            (
                position(),
                prop_oneof![
                    Just(Direction::Left),
                    Just(Direction::Right),
                    Just(Direction::Misc)
                ],
                1u32..200,
                0u32..4
            )
                .prop_map(|(p, d, r, o)| WorldObjectDescriptor::from(Entrance::new(p, d, r, o))),
            (position(), 1.0f32..100.0, 1.0f32..100.0, 0u32..4)
                .prop_map(|(p, w, h, o)| WorldObjectDescriptor::from(Exit::new(p, Vec2::new(w, h), o))),
            (position(), 1u32..1000, "[a-z/]{0,12}", 0u32..50)
                .prop_map(|(p, w, s, speed)| WorldObjectDescriptor::from(Liquid::new(p, w, s, speed))),
        ]
    }

    proptest! {
        #[test]
        fn serialize_then_parse_is_identity(
            objects in prop::collection::vec(descriptor(), 0..24),
            limit in prop::option::of(1u32..100_000),
        ) {
            let mut header = LevelHeader::new("prop", Size::new(640, 480), 20, 10);
            header.time_limit = limit;
            let doc = LevelDocument::with_objects(header, objects);

            let f = ContentFactory::new();
            let text = f.serialize(&doc).unwrap();
            let report = f.parse(&text).unwrap();
            prop_assert!(report.is_clean(), "diagnostics: {:?}", report.diagnostics);
            prop_assert_eq!(report.document, doc);
        }
    }
}
