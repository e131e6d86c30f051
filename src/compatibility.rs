//! Schema compatibility checking
//!
//! Decides whether a new structural schema can replace an existing one
//! without breaking consumers of the existing shape, and computes the
//! least common denominator (LCD): the largest schema within the existing
//! structure that the new schema still admits.
//!
//! The walk is pure. Each recursive frame returns either its LCD node or
//! every violation found beneath it, and the caller merges nested results
//! into its own so the whole tree is always reported in one pass.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::CheckConfig;
use crate::field_path::FieldPath;
use crate::schema::SchemaNode;
use crate::violation::{Incompatible, Violation, ViolationList, SCHEMA_CHANGED};
use crate::wildcard::Wildcard;

/// Documentation-only facets that never affect compatibility of a leaf
pub const DEFAULT_IGNORED_ANNOTATIONS: &[&str] = &[
    "description",
    "title",
    "example",
    "externalDocs",
];

/// Object facet listing properties every document must carry
const REQUIRED: &str = "required";

/// Check `new` against `existing` and return their LCD
///
/// With `narrow_existing` unset any loss of capability is an error and a
/// successful result equals `existing`. With it set, properties that `new`
/// no longer admits are silently dropped from the LCD instead.
pub fn compute_compatibility(
    path: &FieldPath,
    existing: &SchemaNode,
    new: &SchemaNode,
    narrow_existing: bool,
) -> Result<SchemaNode, Incompatible> {
    CompatibilityChecker::new()
        .narrow_existing(narrow_existing)
        .check(path, existing, new)
}

type Lcd = Result<SchemaNode, ViolationList>;

/// Compatibility checker for structural schemas
#[derive(Debug, Clone)]
pub struct CompatibilityChecker {
    /// Drop incompatible properties instead of reporting them
    narrow_existing: bool,
    /// Leaf facets excluded from equality
    ignored_annotations: BTreeSet<String>,
}

impl CompatibilityChecker {
    /// Create a strict checker ignoring the default annotations
    pub fn new() -> Self {
        Self {
            narrow_existing: false,
            ignored_annotations: DEFAULT_IGNORED_ANNOTATIONS
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }

    /// Create a checker from the `[check]` configuration section
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new()
            .narrow_existing(config.narrow_existing)
            .ignore_annotations(config.ignored_annotations.iter().cloned())
    }

    /// Enable or disable narrowing
    pub fn narrow_existing(mut self, narrow: bool) -> Self {
        self.narrow_existing = narrow;
        self
    }

    /// Replace the set of ignored leaf annotations
    pub fn ignore_annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_annotations = annotations.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_narrowing(&self) -> bool {
        self.narrow_existing
    }

    /// Compare two schemas rooted at `path`
    ///
    /// On failure no LCD is returned, not even a partial one.
    pub fn check(
        &self,
        path: &FieldPath,
        existing: &SchemaNode,
        new: &SchemaNode,
    ) -> Result<SchemaNode, Incompatible> {
        debug!(path = %path, narrow = self.narrow_existing, "checking schema compatibility");

        match self.lcd(path, existing, new) {
            Ok(lcd) => Ok(lcd),
            Err(violations) => {
                debug!(path = %path, violations = violations.len(), "schema is incompatible");
                violations.into_result(SchemaNode::default())
            }
        }
    }

    fn lcd(&self, path: &FieldPath, existing: &SchemaNode, new: &SchemaNode) -> Lcd {
        if existing.type_ != new.type_ {
            let mut violations = ViolationList::new();
            violations.push(Violation::changed(
                path.child("type"),
                format!("type changed from {:?} to {:?}", existing.type_, new.type_),
            ));
            return Err(violations);
        }

        if existing.is_object() || new.is_object() {
            self.lcd_object(path, existing, new)
        } else {
            self.lcd_leaf(path, existing, new)
        }
    }

    fn lcd_object(&self, path: &FieldPath, existing: &SchemaNode, new: &SchemaNode) -> Lcd {
        let mut violations = ViolationList::new();

        // `required` is checked by name below; every other facet must match.
        if self.significant_facets(existing, &[REQUIRED])
            != self.significant_facets(new, &[REQUIRED])
        {
            violations.push(Violation::changed(path.clone(), SCHEMA_CHANGED));
        }

        let existing_required = required_names(existing);
        let newly_required: Vec<&str> = required_names(new)
            .difference(&existing_required)
            .copied()
            .collect();
        if !newly_required.is_empty() {
            violations.push(Violation::changed(
                path.child(REQUIRED),
                format!("properties {:?} have become required", newly_required),
            ));
        }

        let mut lcd = SchemaNode {
            type_: existing.type_.clone(),
            properties: BTreeMap::new(),
            additional_properties: existing.additional_properties.clone(),
            facets: existing.facets.clone(),
        };

        let properties_path = path.child("properties");
        let new_wildcard = Wildcard::of(new);
        let mut removed = Vec::new();

        for (name, existing_prop) in &existing.properties {
            let prop_path = properties_path.key(name.as_str());
            let outcome = match (new.properties.get(name), new_wildcard) {
                (Some(new_prop), _) => self.lcd(&prop_path, existing_prop, new_prop),
                (None, Wildcard::AllowAny) => Ok(existing_prop.clone()),
                (None, Wildcard::Pattern(pattern)) => self.lcd(&prop_path, existing_prop, pattern),
                (None, Wildcard::Forbidden) => {
                    removed.push(name.clone());
                    continue;
                }
            };

            match outcome {
                Ok(prop_lcd) => {
                    lcd.properties.insert(name.clone(), prop_lcd);
                }
                Err(nested) => violations.merge(nested),
            }
        }

        if !removed.is_empty() {
            if self.narrow_existing {
                trace!(path = %properties_path, removed = ?removed, "narrowing removed properties");
            } else {
                trace!(path = %properties_path, removed = ?removed, "properties removed");
                violations.push(Violation::removed_properties(properties_path, removed));
            }
        }

        let additional_path = path.child("additionalProperties");
        match (Wildcard::of(existing), new_wildcard) {
            (Wildcard::Forbidden, _)
            | (Wildcard::AllowAny, Wildcard::AllowAny)
            | (Wildcard::Pattern(_), Wildcard::AllowAny) => {}
            (Wildcard::Pattern(existing_pattern), Wildcard::Pattern(new_pattern)) => {
                match self.lcd(&additional_path, existing_pattern, new_pattern) {
                    Ok(pattern_lcd) => {
                        if let Some(declaration) = lcd.additional_properties.as_mut() {
                            declaration.schema = Some(Box::new(pattern_lcd));
                        }
                    }
                    Err(nested) => violations.merge(nested),
                }
            }
            (_, restricted) => {
                if self.narrow_existing {
                    trace!(path = %additional_path, "narrowing additional properties");
                    lcd.additional_properties = restricted.to_declaration();
                } else {
                    violations.push(Violation::restricted_wildcard(additional_path));
                }
            }
        }

        if self.narrow_existing {
            retain_satisfiable_required(&mut lcd, existing);
        }

        if violations.is_empty() {
            Ok(lcd)
        } else {
            Err(violations)
        }
    }

    fn lcd_leaf(&self, path: &FieldPath, existing: &SchemaNode, new: &SchemaNode) -> Lcd {
        let same = existing.additional_properties == new.additional_properties
            && self.significant_facets(existing, &[]) == self.significant_facets(new, &[]);

        if same {
            Ok(existing.clone())
        } else {
            let mut violations = ViolationList::new();
            violations.push(Violation::changed(path.clone(), SCHEMA_CHANGED));
            Err(violations)
        }
    }

    fn significant_facets<'a>(
        &self,
        node: &'a SchemaNode,
        except: &[&str],
    ) -> BTreeMap<&'a str, &'a Value> {
        node.facets
            .iter()
            .filter(|(name, _)| {
                !self.ignored_annotations.contains(name.as_str())
                    && !except.contains(&name.as_str())
            })
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }
}

/// Names listed in a node's `required` facet
fn required_names(node: &SchemaNode) -> BTreeSet<&str> {
    node.facets
        .get(REQUIRED)
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Drop required names that a narrowed LCD can no longer satisfy
///
/// A name survives if the LCD still declares it, or if it was never a named
/// property of `existing` and the LCD still admits unnamed properties.
fn retain_satisfiable_required(lcd: &mut SchemaNode, existing: &SchemaNode) {
    let admits_unnamed = Wildcard::of(lcd) != Wildcard::Forbidden;
    let properties = &lcd.properties;

    let emptied = match lcd.facets.get_mut(REQUIRED) {
        Some(Value::Array(names)) => {
            names.retain(|name| match name.as_str() {
                Some(name) => {
                    properties.contains_key(name)
                        || (admits_unnamed && !existing.properties.contains_key(name))
                }
                None => true,
            });
            names.is_empty()
        }
        _ => false,
    };

    if emptied {
        lcd.facets.remove(REQUIRED);
    }
}

impl Default for CompatibilityChecker {
    fn default() -> Self {
        Self::new()
    }
}
