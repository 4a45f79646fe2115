//! Widget field value manager.
//!
//! Turns the values a dashboard author supplied into the complete value map
//! of a widget: supplied values are completed from their declared defaults,
//! absent optional keys get their default, and every field is validated.
//! All failures are collected; a widget is save-ready when none of them
//! concerns a required key.

use std::sync::Arc;

use dash_fields::{
    FieldError, FieldErrorReason, FieldType, FieldValue, ResolvedFieldSchema, ValidationBuilder,
    ValidationContext, ValidatorRegistry, WidgetFieldValueMap, default_attributes, default_value,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::complex::check_cross_fields;
use crate::registry::RegisteredWidget;

/// Default `count` of group-by fields whose schema declares none.
pub const DEFAULT_GROUP_BY_COUNT: usize = dash_fields::constants::DEFAULT_GROUP_BY_COUNT;

/// Configuration of the field value manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerConfig {
    /// Fill absent optional keys with their declared default.
    pub fill_optional_defaults: bool,
    /// Report supplied keys outside the schema as optional errors.
    pub report_unknown_keys: bool,
    /// Run the cross-field checks.
    pub cross_field_checks: bool,
    /// `count` of group-by fields whose schema declares no `defaultMaxCount`.
    pub default_group_by_count: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            fill_optional_defaults: true,
            report_unknown_keys: false,
            cross_field_checks: true,
            default_group_by_count: DEFAULT_GROUP_BY_COUNT,
        }
    }
}

impl ManagerConfig {
    /// Set whether absent optional keys are defaulted.
    #[must_use]
    pub const fn with_fill_optional_defaults(mut self, enabled: bool) -> Self {
        self.fill_optional_defaults = enabled;
        self
    }

    /// Set whether unknown keys are reported.
    #[must_use]
    pub const fn with_report_unknown_keys(mut self, enabled: bool) -> Self {
        self.report_unknown_keys = enabled;
        self
    }

    /// Set whether cross-field checks run.
    #[must_use]
    pub const fn with_cross_field_checks(mut self, enabled: bool) -> Self {
        self.cross_field_checks = enabled;
        self
    }

    /// Set the fallback group-by count.
    #[must_use]
    pub const fn with_default_group_by_count(mut self, count: usize) -> Self {
        self.default_group_by_count = count;
        self
    }
}

/// Result of building a widget's value map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValueBuild {
    /// Completed values in schema order.
    pub map: WidgetFieldValueMap,
    /// Every failure found.
    pub errors: Vec<FieldError>,
    /// Whether no failure concerns a required key.
    pub save_ready: bool,
}

impl FieldValueBuild {
    /// Check if no failure was found at all.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures that block saving.
    pub fn blocking_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(|e| e.is_blocking())
    }

    /// Failures reported for `key`.
    pub fn errors_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors.iter().filter(move |e| e.key == key)
    }
}

/// Builds and validates widget value maps.
#[derive(Debug, Clone)]
pub struct FieldValueManager {
    validators: Arc<ValidatorRegistry>,
    config: ManagerConfig,
}

impl FieldValueManager {
    /// Create a manager.
    #[must_use]
    pub const fn new(validators: Arc<ValidatorRegistry>, config: ManagerConfig) -> Self {
        Self { validators, config }
    }

    /// The manager configuration.
    #[must_use]
    pub const fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The validators in use.
    #[must_use]
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Properties filled into a supplied value of `field`.
    ///
    /// The static default of a non-mapping field is its whole value, so a
    /// required one gets nothing and is validated as supplied.
    fn attribute_defaults(&self, field: &ResolvedFieldSchema) -> FieldValue {
        if field.required && field.options.constraints().is_none() {
            return FieldValue::new();
        }
        let mut defaults = default_attributes(&field.field_type, &field.options);
        if field.field_type == FieldType::GroupBy && defaults.count().is_none() {
            let counted = field
                .options
                .constraints()
                .is_some_and(|c| c.uses_count && !c.hide_count);
            if counted {
                defaults = defaults.with_attribute("count", self.config.default_group_by_count);
            }
        }
        defaults
    }

    /// Build the complete value map of `widget` from the supplied `values`.
    ///
    /// Required keys are never defaulted. Keys outside the schema are
    /// dropped.
    #[must_use]
    pub fn build_field_value_map(
        &self,
        widget: &RegisteredWidget,
        values: &WidgetFieldValueMap,
    ) -> FieldValueBuild {
        let mut map = WidgetFieldValueMap::new();
        for field in widget.fields().values() {
            match values.get(&field.key).filter(|v| !v.is_empty()) {
                Some(supplied) => {
                    let mut value = supplied.clone();
                    value.fill_missing(&self.attribute_defaults(field));
                    map.insert(field.key.clone(), value);
                }
                None if !field.required && self.config.fill_optional_defaults => {
                    if let Some(value) = default_value(&field.field_type, &field.options) {
                        map.insert(field.key.clone(), value);
                    }
                }
                None => {}
            }
        }

        let mut errors = ValidationBuilder::new();
        let ctx = ValidationContext::new(widget.name(), widget.fields(), &map);
        let empty = FieldValue::new();
        for field in widget.fields().values() {
            let value = map.get(&field.key).unwrap_or(&empty);
            errors.check(field, || self.validators.validate(value, field, &ctx));
        }

        for key in values.keys().filter(|key| !widget.fields().contains_key(*key)) {
            warn!(widget = widget.name(), key = %key, "dropping value for unknown field key");
            if self.config.report_unknown_keys {
                errors.push(FieldError::new(
                    key.clone(),
                    FieldType::Custom(key.clone()),
                    false,
                    FieldErrorReason::InvalidValue,
                ));
            }
        }

        if self.config.cross_field_checks {
            check_cross_fields(widget, &map, &mut errors);
        }

        let save_ready = !errors.has_required_errors();
        debug!(
            widget = widget.name(),
            fields = map.len(),
            errors = errors.error_count(),
            save_ready,
            "built field value map"
        );
        FieldValueBuild {
            map,
            errors: errors.into_errors(),
            save_ready,
        }
    }
}
