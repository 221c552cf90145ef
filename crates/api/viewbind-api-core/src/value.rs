//! PropertyValue: kind-erased snapshots of view-model property values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Color;

/// The closed set of property kinds a view-model instance can expose.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Color,
    Enum,
    Trigger,
    Image,
    List,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 8] = [
        PropertyKind::String,
        PropertyKind::Number,
        PropertyKind::Boolean,
        PropertyKind::Color,
        PropertyKind::Enum,
        PropertyKind::Trigger,
        PropertyKind::Image,
        PropertyKind::List,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Number => "number",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Color => "color",
            PropertyKind::Enum => "enum",
            PropertyKind::Trigger => "trigger",
            PropertyKind::Image => "image",
            PropertyKind::List => "list",
        }
    }

    /// Kinds that carry a readable value worth mirroring.
    pub fn has_value(self) -> bool {
        !matches!(self, PropertyKind::Trigger | PropertyKind::Image)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),

    Number(f32),

    Boolean(bool),

    /// Packed ARGB
    Color(Color),

    /// Current enum member
    Enum(String),

    /// Triggers carry no persisted value
    Trigger,

    /// Images are write-only; `true` when an image is assigned
    Image(bool),

    /// List length
    List(usize),
}

impl PropertyValue {
    #[inline]
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Number(_) => PropertyKind::Number,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::Enum(_) => PropertyKind::Enum,
            PropertyValue::Trigger => PropertyKind::Trigger,
            PropertyValue::Image(_) => PropertyKind::Image,
            PropertyValue::List(_) => PropertyKind::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json_shape() {
        let v = PropertyValue::Color(Color::rgb(255, 0, 0));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "color", "data": 0xFFFF0000u32 }));

        let t: PropertyValue = serde_json::from_value(serde_json::json!({ "type": "trigger" })).unwrap();
        assert_eq!(t.kind(), PropertyKind::Trigger);
    }

    #[test]
    fn kinds_without_values() {
        let mirrored: Vec<_> = PropertyKind::ALL.iter().filter(|k| k.has_value()).collect();
        assert_eq!(mirrored.len(), 6);
        assert_eq!(PropertyKind::Enum.to_string(), "enum");
    }
}
