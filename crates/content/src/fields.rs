//! Typed access to the fields of one level-document node.
//!
//! Vectors are written as `{ x, y }` mappings and colors as
//! `{ red, green, blue, alpha }`. Every `read_*` has a matching `write_*`.

use glam::Vec2;
use plumbfield_common::Color;
use serde_yaml::{Mapping, Number, Value};

use crate::ContentError;

/// Where the fields being read came from, for error reporting.
#[derive(Debug, Clone, Copy)]
enum Origin {
    Object { kind: &'static str, node: usize },
    Header,
}

/// Reads named fields out of a mapping node.
pub struct FieldReader<'a> {
    origin: Origin,
    map: &'a Mapping,
}

impl<'a> FieldReader<'a> {
    /// Reader for the object at `node`, parsed as `kind`.
    pub fn object(kind: &'static str, node: usize, map: &'a Mapping) -> Self {
        Self {
            origin: Origin::Object { kind, node },
            map,
        }
    }

    /// Reader for the level header.
    pub fn header(map: &'a Mapping) -> Self {
        Self {
            origin: Origin::Header,
            map,
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.map.get(field).is_some_and(|v| !v.is_null())
    }

    /// Build the error for a field that failed validation.
    pub fn malformed(&self, field: &str, reason: impl Into<String>) -> ContentError {
        match self.origin {
            Origin::Object { kind, node } => ContentError::MalformedField {
                kind: kind.to_string(),
                field: field.to_string(),
                node,
                reason: reason.into(),
            },
            Origin::Header => ContentError::MalformedHeader {
                field: field.to_string(),
                reason: reason.into(),
            },
        }
    }

    fn required(&self, field: &str) -> Result<&'a Value, ContentError> {
        match self.map.get(field) {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(self.malformed(field, "missing required field")),
        }
    }

    fn number(&self, field: &str, value: &Value) -> Result<f32, ContentError> {
        let n = value
            .as_f64()
            .ok_or_else(|| self.malformed(field, "expected a number"))?;
        // Narrow first: values past f32::MAX become infinite here.
        let n = n as f32;
        if !n.is_finite() {
            return Err(self.malformed(field, "number must be finite"));
        }
        Ok(n)
    }

    pub fn read_f32(&self, field: &str) -> Result<f32, ContentError> {
        let value = self.required(field)?;
        self.number(field, value)
    }

    pub fn read_f32_or(&self, field: &str, default: f32) -> Result<f32, ContentError> {
        if self.has(field) {
            self.read_f32(field)
        } else {
            Ok(default)
        }
    }

    pub fn read_u32(&self, field: &str) -> Result<u32, ContentError> {
        let value = self.required(field)?;
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.malformed(field, "expected an unsigned 32-bit integer"))
    }

    pub fn read_u32_or(&self, field: &str, default: u32) -> Result<u32, ContentError> {
        if self.has(field) {
            self.read_u32(field)
        } else {
            Ok(default)
        }
    }

    pub fn read_string(&self, field: &str) -> Result<String, ContentError> {
        let value = self.required(field)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.malformed(field, "expected a string"))
    }

    pub fn read_string_or(&self, field: &str, default: &str) -> Result<String, ContentError> {
        if self.has(field) {
            self.read_string(field)
        } else {
            Ok(default.to_string())
        }
    }

    pub fn read_vector(&self, field: &str) -> Result<Vec2, ContentError> {
        let value = self.required(field)?;
        let map = value
            .as_mapping()
            .ok_or_else(|| self.malformed(field, "expected a vector mapping { x, y }"))?;
        let component = |axis: &str| -> Result<f32, ContentError> {
            let v = map
                .get(axis)
                .ok_or_else(|| self.malformed(field, format!("vector is missing `{axis}`")))?;
            self.number(field, v)
        };
        Ok(Vec2::new(component("x")?, component("y")?))
    }

    pub fn read_vector_or(&self, field: &str, default: Vec2) -> Result<Vec2, ContentError> {
        if self.has(field) {
            self.read_vector(field)
        } else {
            Ok(default)
        }
    }

    pub fn read_color(&self, field: &str) -> Result<Color, ContentError> {
        let value = self.required(field)?;
        let map = value.as_mapping().ok_or_else(|| {
            self.malformed(field, "expected a color mapping { red, green, blue, alpha }")
        })?;
        let channel = |name: &str, default: Option<f32>| -> Result<f32, ContentError> {
            match (map.get(name), default) {
                (Some(v), _) => self.number(field, v),
                (None, Some(d)) => Ok(d),
                (None, None) => Err(self.malformed(field, format!("color is missing `{name}`"))),
            }
        };
        let color = Color::rgba(
            channel("red", None)?,
            channel("green", None)?,
            channel("blue", None)?,
            channel("alpha", Some(1.0))?,
        );
        if !color.is_normalized() {
            return Err(self.malformed(field, "color components must be within 0.0..=1.0"));
        }
        Ok(color)
    }
}

/// Builds a mapping node field by field, in write order.
#[derive(Debug, Default)]
pub struct FieldWriter {
    map: Mapping,
}

impl FieldWriter {
    /// Writer for an object node; `type` is always the first key.
    pub fn object(tag: &str) -> Self {
        let mut writer = Self::default();
        writer.write_string("type", tag);
        writer
    }

    /// Writer for a node without a type tag (the level header).
    pub fn untagged() -> Self {
        Self::default()
    }

    pub fn write_f32(&mut self, field: &str, value: f32) {
        self.map.insert(field.into(), float(value));
    }

    pub fn write_u32(&mut self, field: &str, value: u32) {
        self.map
            .insert(field.into(), Value::Number(Number::from(value)));
    }

    pub fn write_string(&mut self, field: &str, value: &str) {
        self.map.insert(field.into(), Value::String(value.to_string()));
    }

    pub fn write_vector(&mut self, field: &str, value: Vec2) {
        let mut v = Mapping::new();
        v.insert("x".into(), float(value.x));
        v.insert("y".into(), float(value.y));
        self.map.insert(field.into(), Value::Mapping(v));
    }

    pub fn write_color(&mut self, field: &str, color: Color) {
        let mut c = Mapping::new();
        c.insert("red".into(), float(color.red));
        c.insert("green".into(), float(color.green));
        c.insert("blue".into(), float(color.blue));
        c.insert("alpha".into(), float(color.alpha));
        self.map.insert(field.into(), Value::Mapping(c));
    }

    pub fn finish(self) -> Value {
        Value::Mapping(self.map)
    }
}

/// Widen an `f32` through its shortest decimal form so the document shows
/// `0.1` rather than `0.10000000149011612`, unless that would not narrow back
/// to the same value.
fn float(value: f32) -> Value {
    let exact = f64::from(value);
    let widened = match value.to_string().parse::<f64>() {
        Ok(short) if short as f32 == value => short,
        _ => exact,
    };
    Value::Number(Number::from(widened))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(src: &str) -> Mapping {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn reads_vector_and_color() {
        let map = mapping(
            "pos: { x: 3, y: -4.5 }\ncolor: { red: 0.1, green: 0.2, blue: 0.3 }\n",
        );
        let r = FieldReader::object("test", 0, &map);
        assert_eq!(r.read_vector("pos").unwrap(), Vec2::new(3.0, -4.5));
        let c = r.read_color("color").unwrap();
        assert_eq!(c, Color::rgba(0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn missing_field_is_malformed() {
        let map = mapping("other: 1\n");
        let r = FieldReader::object("exit", 2, &map);
        match r.read_vector("position") {
            Err(ContentError::MalformedField {
                kind, field, node, ..
            }) => {
                assert_eq!(kind, "exit");
                assert_eq!(field, "position");
                assert_eq!(node, 2);
            }
            other => panic!("expected MalformedField, got {other:?}"),
        }
    }

    #[test]
    fn malformed_literals_rejected() {
        let map = mapping(
            "a: [1, 2]\nb: { x: 1 }\nc: { red: 2.0, green: 0, blue: 0 }\nd: hello\ne: -3\n",
        );
        let r = FieldReader::object("test", 0, &map);
        assert!(r.read_vector("a").is_err());
        assert!(r.read_vector("b").is_err());
        assert!(r.read_color("c").is_err());
        assert!(r.read_f32("d").is_err());
        assert!(r.read_u32("e").is_err());
    }

    #[test]
    fn numbers_outside_f32_range_rejected() {
        let map = mapping("pos: { x: 1.0e39, y: 0 }\nbig: -1.0e39\nedge: 3.0e38\n");
        let r = FieldReader::object("test", 0, &map);
        match r.read_vector("pos") {
            Err(ContentError::MalformedField { field, reason, .. }) => {
                assert_eq!(field, "pos");
                assert_eq!(reason, "number must be finite");
            }
            other => panic!("expected MalformedField, got {other:?}"),
        }
        assert!(r.read_f32("big").is_err());
        assert_eq!(r.read_f32("edge").unwrap(), 3.0e38);
    }

    #[test]
    fn defaults_apply_only_when_absent() {
        let map = mapping("speed: fast\n");
        let r = FieldReader::object("hotspot", 0, &map);
        assert_eq!(r.read_u32_or("frames", 7).unwrap(), 7);
        assert!(r.read_u32_or("speed", 7).is_err());
    }

    #[test]
    fn header_origin_reports_header_error() {
        let map = mapping("agents: lots\n");
        let r = FieldReader::header(&map);
        assert!(matches!(
            r.read_u32("agents"),
            Err(ContentError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn writer_puts_type_first_and_round_trips() {
        let mut w = FieldWriter::object("liquid");
        w.write_vector("position", Vec2::new(0.1, 2.0));
        w.write_color("color", Color::rgba(0.3, 0.6, 0.9, 0.5));
        w.write_u32("width", 64);
        let value = w.finish();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.iter().next().unwrap().0.as_str(), Some("type"));

        let text = serde_yaml::to_string(&value).unwrap();
        assert!(text.contains("x: 0.1"));
        let back: Mapping = serde_yaml::from_str(&text).unwrap();
        let r = FieldReader::object("liquid", 0, &back);
        assert_eq!(r.read_vector("position").unwrap(), Vec2::new(0.1, 2.0));
        assert_eq!(
            r.read_color("color").unwrap(),
            Color::rgba(0.3, 0.6, 0.9, 0.5)
        );
        assert_eq!(r.read_u32("width").unwrap(), 64);
    }
}
