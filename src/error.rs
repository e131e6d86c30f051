//! Error types for schema compatibility checking

use thiserror::Error;

use crate::violation::Incompatible;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema compatibility errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema is incompatible: {0}")]
    Incompatible(#[from] Incompatible),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
