//! Error types for widget registration and publishing.

use dash_fields::FieldSchemaError;
use thiserror::Error;

use crate::model::WidgetState;

/// Result type alias for widget registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while registering, looking up or publishing widgets.
///
/// Registration errors are configuration defects: callers abort bootstrap
/// instead of continuing with a partial registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No widget config with this name.
    #[error("unknown widget: {0}")]
    UnknownWidget(String),

    /// A widget config with this name is already registered.
    #[error("widget already registered: {0}")]
    DuplicateWidget(String),

    /// A field key appears in both the required and the optional schema.
    #[error("widget {widget}: field key '{key}' is declared twice")]
    DuplicateFieldKey {
        /// Widget name.
        widget: String,
        /// The repeated key.
        key: String,
    },

    /// An override names a field key the widget does not declare.
    #[error("widget {widget}: unknown field key '{key}'")]
    UnknownFieldKey {
        /// Widget name.
        widget: String,
        /// The unknown key.
        key: String,
    },

    /// A field type or option override could not be resolved.
    #[error("widget {widget}: {source}")]
    InvalidField {
        /// Widget name.
        widget: String,
        /// Underlying field schema error.
        #[source]
        source: FieldSchemaError,
    },

    /// A widget that consumes data declares no required field.
    #[error("widget {0} consumes data but declares no required fields")]
    MissingRequiredFields(String),

    /// No stored widget with this id.
    #[error("widget not found: {0}")]
    WidgetNotFound(String),

    /// A stored widget with this id already exists.
    #[error("widget id already exists: {0}")]
    DuplicateWidgetId(String),

    /// The widget lifecycle does not allow this transition.
    #[error("invalid widget state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: WidgetState,
        /// Attempted target state.
        to: WidgetState,
    },
}

impl RegistryError {
    /// Wrap a field schema error with the widget it occurred in.
    #[must_use]
    pub fn invalid_field(widget: impl Into<String>, source: FieldSchemaError) -> Self {
        Self::InvalidField {
            widget: widget.into(),
            source,
        }
    }

    /// Check if the error names an unknown field type.
    #[must_use]
    pub const fn is_unknown_field_type(&self) -> bool {
        matches!(
            self,
            Self::InvalidField {
                source: FieldSchemaError::UnknownFieldType(_),
                ..
            }
        )
    }
}
