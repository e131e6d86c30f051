//! Checksums identifying schema documents

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::schema::SchemaNode;

/// SHA256 checksum of a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum of a schema node
    ///
    /// Properties and facets are ordered maps, so the compact JSON
    /// rendering is canonical.
    pub fn of_schema(schema: &SchemaNode) -> Result<Self> {
        let canonical = serde_json::to_vec(schema)?;
        Ok(Self::from_bytes(&canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
