//! Checking whole directories of schemas
//!
//! Every `*.json` file under the existing directory is paired with the file
//! at the same relative path under the new directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::compatibility::CompatibilityChecker;
use crate::error::{Result, SchemaError};
use crate::field_path::FieldPath;
use crate::report::{BatchReport, CompatibilityReport};
use crate::schema::SchemaNode;
use crate::violation::Violation;

/// Message used when a whole schema document disappears
pub const SCHEMA_REMOVED: &str = "schema has been removed in an incompatible way";

/// An existing schema file and its counterpart, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPair {
    /// Path relative to both roots, with `/` separators
    pub name: String,
    pub existing: PathBuf,
    pub new: Option<PathBuf>,
}

/// Pair every JSON schema under `existing_dir` with its file under `new_dir`
///
/// Pairs are sorted by name.
pub fn pair_schemas(existing_dir: &Path, new_dir: &Path) -> Result<Vec<SchemaPair>> {
    if !existing_dir.is_dir() {
        return Err(SchemaError::NotFound(existing_dir.display().to_string()));
    }

    let mut pairs = Vec::new();

    for entry in WalkDir::new(existing_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }

        let relative = entry.path().strip_prefix(existing_dir).unwrap_or(entry.path());
        let candidate = new_dir.join(relative);
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        pairs.push(SchemaPair {
            name,
            existing: entry.path().to_path_buf(),
            new: candidate.is_file().then_some(candidate),
        });
    }

    pairs.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = pairs.len(), "paired schema files");
    Ok(pairs)
}

/// Check every pair and collect the reports
pub fn check_pairs(
    pairs: &[SchemaPair],
    checker: &CompatibilityChecker,
    root: &FieldPath,
) -> Result<BatchReport> {
    let mut reports = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let existing = SchemaNode::load(&pair.existing)?;
        let report = match &pair.new {
            Some(new_path) => {
                let new = SchemaNode::load(new_path)?;
                CompatibilityReport::run(&pair.name, checker, root, &existing, &new)?
            }
            None => removed_schema_report(&pair.name, checker, root, &existing)?,
        };

        if !report.compatible {
            warn!(schema = %pair.name, violations = report.violations.len(), "incompatible schema");
        }
        reports.push(report);
    }

    let batch = BatchReport::new(reports);
    info!(
        total = batch.total,
        compatible = batch.compatible,
        incompatible = batch.incompatible,
        "batch compatibility check finished"
    );
    Ok(batch)
}

/// Pair directories and check them in one go
pub fn check_dirs(
    existing_dir: &Path,
    new_dir: &Path,
    checker: &CompatibilityChecker,
    root: &FieldPath,
) -> Result<BatchReport> {
    let pairs = pair_schemas(existing_dir, new_dir)?;
    check_pairs(&pairs, checker, root)
}

/// Report for an existing schema with no counterpart
///
/// Only an object schema can be narrowed away, to one admitting no
/// properties. Any other removed schema is always a violation.
fn removed_schema_report(
    name: &str,
    checker: &CompatibilityChecker,
    root: &FieldPath,
    existing: &SchemaNode,
) -> Result<CompatibilityReport> {
    if checker.is_narrowing() && existing.is_object() {
        let mut facets = existing.facets.clone();
        facets.remove("required");
        let lcd = SchemaNode {
            type_: existing.type_.clone(),
            properties: Default::default(),
            additional_properties: None,
            facets,
        };

        let mut report = CompatibilityReport::from_outcome(name, root, existing, Ok(lcd))?;
        report.narrowed = true;
        Ok(report)
    } else {
        let outcome = Err(vec![Violation::changed(root.clone(), SCHEMA_REMOVED)]);
        CompatibilityReport::from_outcome(name, root, existing, outcome)
    }
}
