//! Structural schema nodes
//!
//! Only the parts of a schema the compatibility check walks are modelled as
//! fields (`type`, `properties`, `additionalProperties`). Every other facet
//! is kept verbatim in [`SchemaNode::facets`] and compared as an opaque value.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, SchemaError};
use crate::wildcard::AdditionalProperties;

/// Type tag of object nodes
pub const OBJECT_TYPE: &str = "object";

/// A node of a structural schema tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Type tag (e.g. "object", "string"); empty when untyped
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_: String,

    /// Named child schemas. Ordered by name so traversal is deterministic.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    /// Policy for properties not named in `properties`
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    /// All remaining facets (items, enum, format, description, ...)
    #[serde(flatten)]
    pub facets: BTreeMap<String, Value>,
}

impl SchemaNode {
    /// An empty object schema
    pub fn object() -> Self {
        Self::typed(OBJECT_TYPE)
    }

    /// A schema with only a type tag
    pub fn typed(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            ..Self::default()
        }
    }

    /// Add a named property
    pub fn with_property(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Set the additional-properties declaration
    pub fn with_additional_properties(mut self, additional: AdditionalProperties) -> Self {
        self.additional_properties = Some(additional);
        self
    }

    /// Add an opaque facet
    pub fn with_facet(mut self, name: impl Into<String>, value: Value) -> Self {
        self.facets.insert(name.into(), value);
        self
    }

    /// Whether the property/wildcard rules apply to this node
    pub fn is_object(&self) -> bool {
        self.type_ == OBJECT_TYPE || (self.type_.is_empty() && !self.properties.is_empty())
    }

    /// Decode from an already-parsed JSON document
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| SchemaError::InvalidFormat(e.to_string()))
    }

    /// Load a schema from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            SchemaError::InvalidFormat(format!("{}: {}", path.display(), e))
        })
    }

    /// Encode back into a JSON document
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_object_schema() {
        let node = SchemaNode::from_json(&json!({
            "type": "object",
            "description": "a widget",
            "properties": {
                "name": { "type": "string", "maxLength": 10 },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "additionalProperties": false
        }))
        .unwrap();

        assert!(node.is_object());
        assert_eq!(node.properties.len(), 2);
        assert_eq!(node.properties["name"].facets["maxLength"], json!(10));
        assert_eq!(node.facets["description"], json!("a widget"));
        assert_eq!(
            node.additional_properties,
            Some(AdditionalProperties::allows(false))
        );
    }

    #[test]
    fn test_encode_is_stable() {
        let node = SchemaNode::object()
            .with_property("b", SchemaNode::typed("string"))
            .with_property("a", SchemaNode::typed("integer"))
            .with_facet("description", json!("d"));

        let encoded = node.to_json().unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer" },
                    "b": { "type": "string" }
                },
                "description": "d"
            })
        );
        assert_eq!(SchemaNode::from_json(&encoded).unwrap(), node);
    }

    #[test]
    fn test_untyped_with_properties_is_object() {
        let node = SchemaNode::default().with_property("x", SchemaNode::typed("string"));
        assert!(node.is_object());
        assert!(!SchemaNode::typed("string").is_object());
    }

    #[test]
    fn test_invalid_document() {
        let err = SchemaNode::from_json(&json!({ "properties": 3 })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidFormat(_)));
    }
}
