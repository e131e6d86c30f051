//! Structural Schema Compatibility
//!
//! Decides whether a new version of a structural schema may replace the
//! existing one without breaking consumers bound to the existing shape, and
//! computes the least common denominator (LCD) schema both versions agree on.
//!
//! ## Features
//!
//! - **Lock-step comparison**: existing and new trees are walked together,
//!   property by property, honouring `additionalProperties` wildcards
//! - **Complete diagnostics**: every incompatibility is reported with its
//!   field path in a single aggregate error
//! - **Narrowing**: optionally shrink the existing schema to the largest
//!   subset the new schema still admits instead of failing
//! - **Batch checks**: compare whole directories of JSON schemas
//!
//! ## Example
//!
//! ```
//! use schemacompat::{compute_compatibility, FieldPath, SchemaNode};
//!
//! let existing = SchemaNode::object()
//!     .with_property("name", SchemaNode::typed("string"))
//!     .with_property("age", SchemaNode::typed("integer"));
//! let new = SchemaNode::object().with_property("name", SchemaNode::typed("string"));
//! let path = FieldPath::from_segments(["schema", "openAPISchema"]);
//!
//! let err = compute_compatibility(&path, &existing, &new, false).unwrap_err();
//! assert_eq!(err.violations()[0].removed, vec!["age"]);
//!
//! let lcd = compute_compatibility(&path, &existing, &new, true).unwrap();
//! assert_eq!(lcd, new);
//! ```

pub mod batch;
pub mod checksum;
pub mod compatibility;
pub mod config;
pub mod error;
pub mod field_path;
pub mod report;
pub mod schema;
pub mod violation;
pub mod wildcard;

pub use batch::{check_dirs, check_pairs, pair_schemas, SchemaPair};
pub use checksum::Checksum;
pub use compatibility::{compute_compatibility, CompatibilityChecker};
pub use config::CompatConfig;
pub use error::{Result, SchemaError};
pub use field_path::{FieldPath, PathSegment};
pub use report::{BatchReport, CompatibilityReport};
pub use schema::SchemaNode;
pub use violation::{Incompatible, Violation, ViolationList};
pub use wildcard::{AdditionalProperties, Wildcard};
