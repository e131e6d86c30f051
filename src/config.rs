//! Configuration management for schema compatibility checks
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemacompat.toml)
//! - Environment variables (SCHEMACOMPAT__*)
//!
//! ## Example config file (schemacompat.toml):
//! ```toml
//! [check]
//! root_path = "schema.openAPISchema"
//! narrow_existing = false
//! ignored_annotations = ["description", "title"]
//!
//! [output]
//! format = "pretty"
//! include_lcd = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::compatibility::DEFAULT_IGNORED_ANNOTATIONS;
use crate::field_path::FieldPath;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatConfig {
    /// Comparison settings
    #[serde(default)]
    pub check: CheckConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Comparison settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Dotted path that violations are reported under
    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Silently drop incompatible properties instead of failing
    #[serde(default)]
    pub narrow_existing: bool,

    /// Leaf facets that never affect compatibility
    #[serde(default = "default_ignored_annotations")]
    pub ignored_annotations: Vec<String>,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Embed the LCD schema in reports
    #[serde(default = "default_true")]
    pub include_lcd: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    /// Render a value in this format
    pub fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

fn default_root_path() -> String {
    "schema.openAPISchema".to_string()
}

fn default_ignored_annotations() -> Vec<String> {
    DEFAULT_IGNORED_ANNOTATIONS.iter().map(|a| a.to_string()).collect()
}

fn default_true() -> bool {
    true
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            narrow_existing: false,
            ignored_annotations: default_ignored_annotations(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            include_lcd: true,
        }
    }
}

impl CheckConfig {
    /// Path that top-level comparisons are rooted at
    pub fn root(&self) -> FieldPath {
        FieldPath::parse_dotted(&self.root_path)
    }
}

impl CompatConfig {
    /// Load configuration from the default locations, layering an explicit
    /// file and the environment over them
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schemacompat.toml",
            ".schemacompat.toml",
            "config/schemacompat.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "schemacompat") {
            let xdg_config = dirs.config_dir().join("schemacompat.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMACOMPAT")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompatConfig::default();
        assert!(!config.check.narrow_existing);
        assert_eq!(config.check.root().to_string(), "schema.openAPISchema");
        assert!(config.check.ignored_annotations.contains(&"description".to_string()));
        assert!(config.output.include_lcd);
    }

    #[test]
    fn test_serialize_config() {
        let toml_str = CompatConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("[check]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            concat!(
                "[check]\nnarrow_existing = true\nroot_path = \"spec\"\n\n",
                "[output]\nformat = \"compact\"\n",
            ),
        )
        .unwrap();

        let config = CompatConfig::load_from(path.to_str()).unwrap();
        assert!(config.check.narrow_existing);
        assert_eq!(config.check.root(), FieldPath::new("spec"));
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert_eq!(config.check.ignored_annotations, default_ignored_annotations());
    }
}
