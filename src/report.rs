//! Serializable compatibility reports

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::checksum::Checksum;
use crate::compatibility::CompatibilityChecker;
use crate::error::Result;
use crate::field_path::FieldPath;
use crate::schema::SchemaNode;
use crate::violation::Violation;

/// Outcome of checking one existing/new schema pair
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    /// Name of the schema (usually its relative file path)
    pub name: String,
    /// Root path of the comparison
    pub path: FieldPath,
    /// Whether `new` may replace `existing`
    pub compatible: bool,
    /// Whether the LCD is narrower than `existing`
    pub narrowed: bool,
    /// Every violation found; empty when compatible
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// The LCD schema, when compatible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcd: Option<SchemaNode>,
    /// Checksum of the LCD schema, when compatible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcd_checksum: Option<Checksum>,
    /// When this report was produced
    pub generated_at: DateTime<Utc>,
}

impl CompatibilityReport {
    /// Run `checker` on a pair and record the outcome
    pub fn run(
        name: impl Into<String>,
        checker: &CompatibilityChecker,
        path: &FieldPath,
        existing: &SchemaNode,
        new: &SchemaNode,
    ) -> Result<Self> {
        let outcome = checker.check(path, existing, new);
        Self::from_outcome(name, path, existing, outcome.map_err(|e| e.into_violations()))
    }

    /// Build a report from a finished comparison
    pub fn from_outcome(
        name: impl Into<String>,
        path: &FieldPath,
        existing: &SchemaNode,
        outcome: std::result::Result<SchemaNode, Vec<Violation>>,
    ) -> Result<Self> {
        let (lcd, violations) = match outcome {
            Ok(lcd) => (Some(lcd), Vec::new()),
            Err(violations) => (None, violations),
        };
        let lcd_checksum = lcd.as_ref().map(Checksum::of_schema).transpose()?;

        Ok(Self {
            name: name.into(),
            path: path.clone(),
            compatible: lcd.is_some(),
            narrowed: lcd.as_ref().is_some_and(|l| l != existing),
            violations,
            lcd,
            lcd_checksum,
            generated_at: Utc::now(),
        })
    }

    /// Drop the embedded LCD schema, keeping its checksum
    pub fn without_lcd(mut self) -> Self {
        self.lcd = None;
        self
    }
}

/// Reports for a set of schema pairs
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub compatible: usize,
    pub narrowed: usize,
    pub incompatible: usize,
    pub reports: Vec<CompatibilityReport>,
}

impl BatchReport {
    pub fn new(reports: Vec<CompatibilityReport>) -> Self {
        let compatible = reports.iter().filter(|r| r.compatible).count();
        Self {
            generated_at: Utc::now(),
            total: reports.len(),
            compatible,
            narrowed: reports.iter().filter(|r| r.narrowed).count(),
            incompatible: reports.len() - compatible,
            reports,
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.incompatible == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (SchemaNode, SchemaNode) {
        let existing = SchemaNode::object()
            .with_property("a", SchemaNode::typed("string"))
            .with_property("b", SchemaNode::typed("string"));
        let new = SchemaNode::object().with_property("a", SchemaNode::typed("string"));
        (existing, new)
    }

    #[test]
    fn test_incompatible_report() {
        let (existing, new) = pair();
        let report = CompatibilityReport::run(
            "widget.json",
            &CompatibilityChecker::new(),
            &FieldPath::new("spec"),
            &existing,
            &new,
        )
        .unwrap();

        assert!(!report.compatible);
        assert!(!report.narrowed);
        assert!(report.lcd.is_none());
        assert!(report.lcd_checksum.is_none());
        assert_eq!(report.violations.len(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["violations"][0]["path"], "spec.properties");
        assert_eq!(json["violations"][0]["removed"][0], "b");
    }

    #[test]
    fn test_narrowed_report() {
        let (existing, new) = pair();
        let checker = CompatibilityChecker::new().narrow_existing(true);
        let report =
            CompatibilityReport::run("widget.json", &checker, &FieldPath::root(), &existing, &new)
                .unwrap();

        assert!(report.compatible);
        assert!(report.narrowed);
        assert_eq!(report.lcd.as_ref(), Some(&new));

        let batch = BatchReport::new(vec![report.without_lcd()]);
        assert_eq!((batch.total, batch.compatible, batch.narrowed), (1, 1, 1));
        assert!(batch.is_compatible());
        assert!(batch.reports[0].lcd_checksum.is_some());
    }
}
