//! Field paths locating a node inside a schema tree
//!
//! Paths are immutable: every append returns a fresh path, so recursive
//! branches can share a parent without any undo bookkeeping.

use serde::{Serialize, Serializer};
use std::fmt;

/// A single step in a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named child field (e.g. `properties`)
    Child(String),
    /// A key inside a map-valued field (e.g. a property name)
    Key(String),
    /// A position inside a list-valued field
    Index(usize),
}

/// Locator for a node of a schema tree, e.g. `spec.properties[name].type`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create a path rooted at a single named field
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Child(root.into())],
        }
    }

    /// The empty path
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a path from a sequence of named fields
    pub fn from_segments<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: names
                .into_iter()
                .map(|n| PathSegment::Child(n.into()))
                .collect(),
        }
    }

    /// Parse a dotted path such as `schema.openAPISchema`
    pub fn parse_dotted(dotted: &str) -> Self {
        Self::from_segments(dotted.split('.').filter(|s| !s.is_empty()))
    }

    /// Append a named child field
    pub fn child(&self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Child(name.into()))
    }

    /// Append a map key
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathSegment::Key(key.into()))
    }

    /// Append a list index
    pub fn index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Child(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Child(name) => write!(f, ".{}", name)?,
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_children_and_keys() {
        let path = FieldPath::from_segments(["schema", "openAPISchema"])
            .child("properties")
            .key("prop2")
            .child("properties");
        assert_eq!(
            path.to_string(),
            "schema.openAPISchema.properties[prop2].properties"
        );
    }

    #[test]
    fn test_append_does_not_mutate_parent() {
        let parent = FieldPath::new("spec");
        let left = parent.child("left");
        let right = parent.child("right").index(3);

        assert_eq!(parent.to_string(), "spec");
        assert_eq!(left.to_string(), "spec.left");
        assert_eq!(right.to_string(), "spec.right[3]");
        assert_eq!(parent.segments().len(), 1);
    }

    #[test]
    fn test_parse_dotted() {
        let path = FieldPath::parse_dotted("schema.openAPISchema");
        assert_eq!(path, FieldPath::from_segments(["schema", "openAPISchema"]));
        assert!(FieldPath::parse_dotted("").is_root());
    }

    #[test]
    fn test_serializes_as_string() {
        let path = FieldPath::new("spec").key("a");
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!("spec[a]"));
    }
}
