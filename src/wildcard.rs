//! Additional-properties declarations
//!
//! In a schema document `additionalProperties` is either a boolean or a
//! schema. [`AdditionalProperties`] mirrors that decoded dual encoding and
//! [`Wildcard`] is the three-way view the comparator works with.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::SchemaNode;

/// Decoded `additionalProperties` value
///
/// When `schema` is present it is authoritative and `allows` is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalProperties {
    pub allows: bool,
    pub schema: Option<Box<SchemaNode>>,
}

impl AdditionalProperties {
    /// `additionalProperties: true` / `false`
    pub fn allows(allows: bool) -> Self {
        Self {
            allows,
            schema: None,
        }
    }

    /// `additionalProperties: { ...schema... }`
    pub fn schema(schema: SchemaNode) -> Self {
        Self {
            allows: true,
            schema: Some(Box::new(schema)),
        }
    }
}

impl<'de> Deserialize<'de> for AdditionalProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Allows(bool),
            Schema(Box<SchemaNode>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Allows(allows) => Self::allows(allows),
            Repr::Schema(schema) => Self {
                allows: true,
                schema: Some(schema),
            },
        })
    }
}

impl Serialize for AdditionalProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.schema {
            Some(schema) => schema.serialize(serializer),
            None => serializer.serialize_bool(self.allows),
        }
    }
}

/// What a schema admits for properties it does not name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wildcard<'a> {
    /// No unnamed property is admitted
    Forbidden,
    /// Any unnamed property is admitted, unconstrained
    AllowAny,
    /// Unnamed properties are admitted if they conform to the schema
    Pattern(&'a SchemaNode),
}

impl<'a> Wildcard<'a> {
    /// Classify a declaration; a present schema wins over the boolean flag
    pub fn resolve(declaration: Option<&'a AdditionalProperties>) -> Self {
        match declaration {
            Some(AdditionalProperties {
                schema: Some(schema),
                ..
            }) => Wildcard::Pattern(&**schema),
            Some(AdditionalProperties { allows: true, .. }) => Wildcard::AllowAny,
            _ => Wildcard::Forbidden,
        }
    }

    /// Wildcard declared by a schema node
    pub fn of(node: &'a SchemaNode) -> Self {
        Self::resolve(node.additional_properties.as_ref())
    }

    /// Encode back into a declaration
    pub fn to_declaration(self) -> Option<AdditionalProperties> {
        match self {
            Wildcard::Forbidden => Some(AdditionalProperties::allows(false)),
            Wildcard::AllowAny => Some(AdditionalProperties::allows(true)),
            Wildcard::Pattern(schema) => Some(AdditionalProperties::schema(schema.clone())),
        }
    }
}
