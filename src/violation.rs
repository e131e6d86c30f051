//! Compatibility violations and their aggregate
//!
//! A comparison never stops at the first problem. Each frame of the
//! recursive walk returns a [`ViolationList`] which the caller merges into
//! its own, and the top level turns a non-empty list into a single
//! [`Incompatible`] error.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::field_path::FieldPath;

/// Message used when named properties disappear from a schema
pub const PROPERTIES_REMOVED: &str = "properties have been removed in an incompatible way";

/// Message used when an additional-properties wildcard gets narrower
pub const WILDCARD_RESTRICTED: &str =
    "additional properties have been restricted in an incompatible way";

/// Message used when a schema's own facets differ
pub const SCHEMA_CHANGED: &str = "schema has changed in an incompatible way";

/// A single incompatibility found at one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Where in the schema tree the problem was found
    pub path: FieldPath,
    /// Names of the properties that were removed, if any
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
    /// Human-readable description
    pub message: String,
}

impl Violation {
    /// Properties removed at one nesting level, reported together
    pub fn removed_properties(path: FieldPath, names: Vec<String>) -> Self {
        Self {
            path,
            removed: names,
            message: PROPERTIES_REMOVED.to_string(),
        }
    }

    /// The additional-properties wildcard no longer admits what it used to
    pub fn restricted_wildcard(path: FieldPath) -> Self {
        Self {
            path,
            removed: Vec::new(),
            message: WILDCARD_RESTRICTED.to_string(),
        }
    }

    /// A value at `path` changed incompatibly
    pub fn changed(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            removed: Vec::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed.is_empty() {
            write!(f, "{}: Invalid value: {}", self.path, self.message)
        } else {
            let names: Vec<String> = self.removed.iter().map(|n| format!("{:?}", n)).collect();
            write!(
                f,
                "{}: Invalid value: [{}]: {}",
                self.path,
                names.join(","),
                self.message
            )
        }
    }
}

/// Ordered accumulator of violations for one comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Append everything collected by a nested comparison
    pub fn merge(&mut self, other: ViolationList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Succeed with `value` when nothing was collected, fail otherwise
    pub fn into_result<T>(self, value: T) -> Result<T, Incompatible> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(Incompatible { violations: self.0 })
        }
    }
}

impl Extend<Violation> for ViolationList {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ViolationList {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The new schema cannot replace the existing one
///
/// Always holds at least one violation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", render_aggregate(.violations))]
pub struct Incompatible {
    violations: Vec<Violation>,
}

impl Incompatible {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

fn render_aggregate(violations: &[Violation]) -> String {
    match violations {
        [single] => single.to_string(),
        many => {
            let rendered: Vec<String> = many.iter().map(|v| v.to_string()).collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}
