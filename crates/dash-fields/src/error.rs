//! Error types for field schemas and field value validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field_type::FieldType;

/// Result type alias for field schema operations.
pub type FieldResult<T> = Result<T, FieldSchemaError>;

/// Registration and option-resolution errors.
///
/// These indicate a broken widget or field definition and are returned while
/// the registries are being built. Callers are expected to abort bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldSchemaError {
    /// The field type is not registered.
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    /// A field type with the same name is already registered.
    #[error("field type already registered: {0}")]
    DuplicateFieldType(String),

    /// An option override names a key the field type does not declare.
    #[error("invalid option key '{key}' for field type {field_type}")]
    InvalidOptionKey {
        /// Field type whose options were being resolved.
        field_type: String,
        /// The offending override key.
        key: String,
    },

    /// An option override has the wrong value type.
    #[error("invalid option value for field type {field_type}: {reason}")]
    InvalidOptionValue {
        /// Field type whose options were being resolved.
        field_type: String,
        /// Deserializer message.
        reason: String,
    },
}

impl FieldSchemaError {
    /// Create an invalid option key error.
    #[must_use]
    pub fn invalid_option_key(field_type: &FieldType, key: impl Into<String>) -> Self {
        Self::InvalidOptionKey {
            field_type: field_type.to_string(),
            key: key.into(),
        }
    }

    /// Create an invalid option value error.
    #[must_use]
    pub fn invalid_option_value(field_type: &FieldType, reason: impl Into<String>) -> Self {
        Self::InvalidOptionValue {
            field_type: field_type.to_string(),
            reason: reason.into(),
        }
    }
}

/// Why a single field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorReason {
    /// A required field is missing or empty.
    Required,
    /// Array supplied where a scalar is expected, or the reverse, or the
    /// value does not have the shape the field type reads.
    ShapeMismatch,
    /// More columns selected than the field allows.
    TooManySelected,
    /// Top-N count missing, forbidden or outside `1..=max`.
    CountOutOfRange,
    /// The value's version is not supported by the field type.
    UnsupportedVersion,
    /// The value is well formed but not acceptable.
    InvalidValue,
    /// The value conflicts with another field of the same widget.
    Conflict,
}

impl FieldErrorReason {
    /// The snake_case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::ShapeMismatch => "shape_mismatch",
            Self::TooManySelected => "too_many_selected",
            Self::CountOutOfRange => "count_out_of_range",
            Self::UnsupportedVersion => "unsupported_version",
            Self::InvalidValue => "invalid_value",
            Self::Conflict => "conflict",
        }
    }
}

impl fmt::Display for FieldErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected field value, returned as data so every failure can be shown at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("field '{key}' ({field_type}): {reason}")]
pub struct FieldError {
    /// Field key within the widget.
    pub key: String,
    /// Field type of the key.
    pub field_type: FieldType,
    /// Whether the key is in the required schema.
    pub required: bool,
    /// Why the value was rejected.
    pub reason: FieldErrorReason,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        field_type: FieldType,
        required: bool,
        reason: FieldErrorReason,
    ) -> Self {
        Self {
            key: key.into(),
            field_type,
            required,
            reason,
        }
    }

    /// Create a "required" error for a required key.
    #[must_use]
    pub fn required(key: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(key, field_type, true, FieldErrorReason::Required)
    }

    /// Check if this error blocks saving the widget.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_error() {
        let err = FieldError::required("granularity", FieldType::Granularity);
        assert!(err.is_blocking());
        assert_eq!(err.reason, FieldErrorReason::Required);
        assert_eq!(err.to_string(), "field 'granularity' (granularity): required");
    }

    #[test]
    fn test_field_error_serializes_camel_case() {
        let err = FieldError::new("xAxis", FieldType::XAxis, false, FieldErrorReason::CountOutOfRange);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["fieldType"], "xAxis");
        assert_eq!(json["reason"], "count_out_of_range");
        assert_eq!(json["required"], false);
    }

    #[test]
    fn test_invalid_option_key_message() {
        let err = FieldSchemaError::invalid_option_key(&FieldType::XAxis, "maxx");
        assert_eq!(err.to_string(), "invalid option key 'maxx' for field type xAxis");
    }

    #[test]
    fn test_reason_display_matches_serde() {
        for reason in [
            FieldErrorReason::Required,
            FieldErrorReason::ShapeMismatch,
            FieldErrorReason::Conflict,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{reason}\""));
        }
    }
}
