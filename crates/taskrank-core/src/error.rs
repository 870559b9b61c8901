//! Core error types for taskrank-core.
//!
//! The scoring pipeline itself never fails: malformed fields are recovered
//! with defaults. Errors only arise at the edges, when loading configuration
//! or structurally validating an incoming batch of task records.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Core error type for taskrank-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Structural problems found in one item of a submitted batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemErrors {
    /// Position of the item in the submitted array
    pub index: usize,
    /// Field name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The `tasks` payload was not a JSON array
    #[error("Provide 'tasks' as a JSON array in body under 'tasks'.")]
    NotAnArray,

    /// One or more items failed structural checks
    #[error("{} task(s) failed validation", .0.len())]
    Items(Vec<ItemErrors>),
}

impl ValidationError {
    /// Per-item errors, empty for payload-level failures.
    pub fn items(&self) -> &[ItemErrors] {
        match self {
            ValidationError::Items(items) => items,
            ValidationError::NotAnArray => &[],
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_errors_count_in_message() {
        let err = ValidationError::Items(vec![
            ItemErrors { index: 0, errors: BTreeMap::new() },
            ItemErrors { index: 3, errors: BTreeMap::new() },
        ]);
        assert_eq!(err.to_string(), "2 task(s) failed validation");
        assert_eq!(err.items().len(), 2);
    }

    #[test]
    fn config_error_wraps_into_core() {
        let err: CoreError = ConfigError::UnknownKey("nope".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }
}
