//! PropertyPath parsing and formatting.
//!
//! Grammar (simple, runtime-agnostic):
//!   group/.../field
//! - the delimiter (default '/') separates nesting levels inside a view-model instance
//! - every segment must be non-empty
//!   Examples:
//!   "user/name" -> segments=["user","name"], leaf="name"
//!   "mode" -> segments=["mode"], leaf="mode"
//!
//! The canonical string form always uses '/', which is what runtimes expect when
//! looking a property up. Hosts that prefer another delimiter parse with
//! [`PropertyPath::parse_with`] and hand the canonical form to the runtime.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical nesting delimiter understood by runtimes.
pub const DEFAULT_DELIMITER: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty property path")]
    Empty,
    #[error("invalid property path '{path}': empty segment at index {index}")]
    EmptySegment { path: String, index: usize },
    #[error("invalid property path '{path}': segment '{segment}' has surrounding whitespace")]
    PaddedSegment { path: String, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parse a path using the canonical '/' delimiter.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        Self::parse_with(s, DEFAULT_DELIMITER)
    }

    /// Parse a path whose nesting levels are separated by `delimiter`.
    pub fn parse_with(s: &str, delimiter: char) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for (index, seg) in s.split(delimiter).enumerate() {
            if seg.is_empty() {
                return Err(PathError::EmptySegment {
                    path: s.to_string(),
                    index,
                });
            }
            if seg.trim() != seg {
                return Err(PathError::PaddedSegment {
                    path: s.to_string(),
                    segment: seg.to_string(),
                });
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    /// Build a path from already validated segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        let joined = segments.join("/");
        if let Some(index) = segments.iter().position(|s| s.is_empty()) {
            return Err(PathError::EmptySegment {
                path: joined,
                index,
            });
        }
        Ok(Self { segments })
    }

    /// Iterate over all segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_str())
    }

    /// Number of nesting levels.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment: the property name inside its innermost instance.
    pub fn leaf(&self) -> &str {
        // parse/from_segments never produce an empty path
        self.segments.last().map(|s| s.as_str()).unwrap_or_default()
    }

    /// Path of the enclosing group, `None` for top-level properties.
    pub fn parent(&self) -> Option<PropertyPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Append a child segment, returning the nested path.
    pub fn join(&self, child: &str) -> Result<PropertyPath, PathError> {
        let child = PropertyPath::parse(child)?;
        let mut segments = self.segments.clone();
        segments.extend(child.segments);
        Ok(Self { segments })
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for PropertyPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D>(deserializer: D) -> Result<PropertyPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropertyPath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested() {
        let p = PropertyPath::parse("user/profile/name").unwrap();
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["user", "profile", "name"]);
        assert_eq!(p.leaf(), "name");
        assert_eq!(p.parent().unwrap().to_string(), "user/profile");
        assert!(p.is_nested());
        assert_eq!(p.to_string(), "user/profile/name");
    }

    #[test]
    fn parse_top_level() {
        let p = PropertyPath::parse("mode").unwrap();
        assert_eq!(p.depth(), 1);
        assert!(p.parent().is_none());
        assert_eq!(p.to_string(), "mode");
    }

    #[test]
    fn parse_with_custom_delimiter_renders_canonically() {
        let p = PropertyPath::parse_with("user.name", '.').unwrap();
        assert_eq!(p.to_string(), "user/name");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(PropertyPath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            PropertyPath::parse("a//b"),
            Err(PathError::EmptySegment { index: 1, .. })
        ));
        assert!(PropertyPath::parse("group/").is_err());
        assert!(PropertyPath::parse(" name").is_err());
    }

    #[test]
    fn inner_spaces_are_allowed() {
        let p = PropertyPath::parse("hero card/display name").unwrap();
        assert_eq!(p.leaf(), "display name");
    }

    #[test]
    fn serde_uses_string_form() {
        let p = PropertyPath::parse("a/b").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"a/b\"");
        let back: PropertyPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<PropertyPath>("\"a//b\"").is_err());
    }
}
