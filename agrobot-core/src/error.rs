//! Error types for agrobot-core

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Category of a configuration validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfigErrorKind {
    /// A required key of a declared section is absent
    MissingField,
    /// A value has the wrong type or is out of the representable range
    TypeMismatch,
    /// Values are well-typed but break a cross-field or range rule
    InvariantViolation,
    /// A string is not one of the recognized names for that field
    UnknownEnumValue,
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigErrorKind::MissingField => "missing field",
            ConfigErrorKind::TypeMismatch => "type mismatch",
            ConfigErrorKind::InvariantViolation => "invariant violation",
            ConfigErrorKind::UnknownEnumValue => "unknown enum value",
        };
        f.write_str(name)
    }
}

/// A configuration bundle failed validation.
///
/// `path` is the dotted path of the offending field, e.g.
/// `mechanical_parameters.tool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at `{path}`: {message}")]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub path: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::MissingField, path, "required field is absent")
    }

    pub fn type_mismatch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::TypeMismatch, path, message)
    }

    pub fn invariant(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::InvariantViolation, path, message)
    }

    pub fn unknown_value(path: impl Into<String>, value: &str, allowed: &[&str]) -> Self {
        Self::new(
            ConfigErrorKind::UnknownEnumValue,
            path,
            format!("`{}` is not one of: {}", value, allowed.join(", ")),
        )
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration for robot `{robot}`: {source}")]
    InvalidBundle {
        robot: String,
        #[source]
        source: ConfigError,
    },

    #[error("Robot `{0}` is defined more than once")]
    DuplicateRobot(String),

    #[error("Unknown robot: {0}")]
    UnknownRobot(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_names_path() {
        let err = ConfigError::unknown_value(
            "mechanical_parameters.tool",
            "unknown_tool",
            &["none", "weed_screw"],
        );
        let text = err.to_string();
        assert!(text.starts_with("unknown enum value"));
        assert!(text.contains("`mechanical_parameters.tool`"));
        assert!(text.contains("unknown_tool"));
    }

    #[test]
    fn test_invalid_bundle_keeps_source() {
        let err = Error::InvalidBundle {
            robot: "rb12".to_string(),
            source: ConfigError::missing("camera_parameters.width"),
        };
        assert!(err.to_string().contains("rb12"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("missing field at `camera_parameters.width`: required field is absent")
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match Error::from(io_err) {
            Error::Io(_) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
