//! Error types for configuration loading and validation.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use super::models::Keypath;

/// Human-readable location for a keypath; the root has no segments.
fn location(keypath: &Keypath) -> String {
    if keypath.is_root() {
        "configuration".to_string()
    } else {
        keypath.to_string()
    }
}

/// Name of the JSON shape of a value, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A violated constraint at one location of the configuration tree.
///
/// Validation is fail-fast: the first violation aborts the whole pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} must be {expected}, found {found}", location(.keypath))]
    TypeMismatch {
        keypath: Keypath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{} {reason}", location(.keypath))]
    InvalidValue { keypath: Keypath, reason: String },

    #[error("{} must not be undefined", location(.keypath))]
    MissingRequiredField { keypath: Keypath },
}

impl ValidationError {
    pub(crate) fn type_mismatch(keypath: &Keypath, expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            keypath: keypath.clone(),
            expected,
            found: value_kind(found),
        }
    }

    pub(crate) fn invalid_value(keypath: &Keypath, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            keypath: keypath.clone(),
            reason: reason.into(),
        }
    }

    /// Location of the offending field.
    pub const fn keypath(&self) -> &Keypath {
        match self {
            Self::TypeMismatch { keypath, .. }
            | Self::InvalidValue { keypath, .. }
            | Self::MissingRequiredField { keypath } => keypath,
        }
    }
}

/// Errors surfaced by the config loader and processor.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to load {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    #[error("suv.config.js must have a default configuration object export, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Failed to apply environment overrides: {0}")]
    Overlay(String),

    #[error("Failed to extract configuration: {0}")]
    Extract(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
