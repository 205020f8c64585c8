//! Error types for container construction, lookups and decoding.

use crate::container::KEY_DELIMITER;
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

// ============================================================================
// ConfigError
// ============================================================================

/// Errors returned by containers, formats and the registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bytes are neither a JSON object nor a JSON array.
    ///
    /// Carries the object decode error; the array attempt's error is dropped.
    #[error("document is not a valid JSON object")]
    Parse(#[source] serde_json::Error),

    #[error("key not found: `{0}`")]
    NotFound(String),

    #[error("value at `{key}` is a {found}, expected a {expected}")]
    Type {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot convert {found} at `{key}` to {target}")]
    Coercion {
        key: String,
        target: &'static str,
        found: String,
    },

    #[error("cannot parse value at `{key}` as an integer")]
    InvalidInt {
        key: String,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to render configuration")]
    Serialize(#[source] serde_json::Error),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("unknown document format `{0}`")]
    UnknownFormat(String),

    #[error("document format `{0}` is already registered")]
    DuplicateFormat(&'static str),
}

impl ConfigError {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound(key.to_string())
    }

    /// True for lookups that failed because nothing lives at the key.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// ============================================================================
// DecodeError
// ============================================================================

/// A value could not be mapped onto the target type.
///
/// `field` is the path of the offending field relative to the decoded
/// sub-tree, with segments joined by `::`. It is empty when the sub-tree
/// root itself has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    field: String,
    message: String,
}

impl DecodeError {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the field path with the segment of the enclosing container.
    pub(crate) fn within(mut self, segment: &str) -> Self {
        self.field = if self.field.is_empty() {
            segment.to_string()
        } else {
            format!("{segment}{KEY_DELIMITER}{}", self.field)
        };
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "cannot decode value: {}", self.message)
        } else {
            write!(f, "cannot decode field `{}`: {}", self.field, self.message)
        }
    }
}

impl std::error::Error for DecodeError {}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self {
            field: String::new(),
            message: msg.to_string(),
        }
    }

    fn missing_field(field: &'static str) -> Self {
        Self {
            field: field.to_string(),
            message: "missing field".to_string(),
        }
    }
}
