//! Error collection across the fields of one widget.

use crate::error::{FieldError, FieldErrorReason};
use crate::schema::ResolvedFieldSchema;

/// Collects field errors without stopping at the first one.
///
/// # Example
///
/// ```
/// use dash_fields::{FieldErrorReason, FieldOptions, FieldType, ResolvedFieldSchema, ValidationBuilder};
///
/// let granularity = ResolvedFieldSchema::new(
///     "granularity",
///     FieldType::Granularity,
///     FieldOptions::defaults_for(&FieldType::Granularity),
///     true,
/// );
///
/// let builder = ValidationBuilder::new()
///     .validate(&granularity, || Err(FieldErrorReason::Required))
///     .validate(&granularity, || Ok(()));
///
/// assert_eq!(builder.error_count(), 1);
/// assert!(builder.has_required_errors());
/// ```
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Run one check and record its failure against `field`.
    #[must_use]
    pub fn validate<F>(mut self, field: &ResolvedFieldSchema, check: F) -> Self
    where
        F: FnOnce() -> Result<(), FieldErrorReason>,
    {
        self.check(field, check);
        self
    }

    /// In-place form of [`Self::validate`].
    pub fn check<F>(&mut self, field: &ResolvedFieldSchema, check: F)
    where
        F: FnOnce() -> Result<(), FieldErrorReason>,
    {
        if let Err(reason) = check() {
            self.reject(field, reason);
        }
    }

    /// Record a failure against `field`.
    pub fn reject(&mut self, field: &ResolvedFieldSchema, reason: FieldErrorReason) {
        self.errors.push(FieldError::new(
            field.key.clone(),
            field.field_type.clone(),
            field.required,
            reason,
        ));
    }

    /// Record an already-built error.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Check if any errors have been collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if any collected error concerns a required key.
    #[must_use]
    pub fn has_required_errors(&self) -> bool {
        self.errors.iter().any(FieldError::is_blocking)
    }

    /// Number of errors collected.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if `key` already has an error.
    #[must_use]
    pub fn has_error_for(&self, key: &str) -> bool {
        self.errors.iter().any(|e| e.key == key)
    }

    /// Collected errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consume and return every collected error.
    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(())` if nothing failed, every error otherwise.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
