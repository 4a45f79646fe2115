//! Widget config registry.

use std::sync::Arc;

use dash_fields::{FieldSchemaMap, FieldSchemaRegistry, ResolvedFieldSchema};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::builtin::builtin_widgets;
use crate::config::{WidgetConfig, integrate_fields_schema};
use crate::error::{RegistryError, RegistryResult};

/// A widget config together with its merged, resolved field lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredWidget {
    config: WidgetConfig,
    fields: FieldSchemaMap,
}

impl RegisteredWidget {
    /// Widget name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.widget_name
    }

    /// The declarative config.
    #[must_use]
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Every field, required first, in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &FieldSchemaMap {
        &self.fields
    }

    /// One field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&ResolvedFieldSchema> {
        self.fields.get(key)
    }

    /// Required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &ResolvedFieldSchema> {
        self.fields.values().filter(|f| f.required)
    }

    /// Optional fields.
    pub fn optional_fields(&self) -> impl Iterator<Item = &ResolvedFieldSchema> {
        self.fields.values().filter(|f| !f.required)
    }
}

/// Option overrides per field key, applied on top of a registered widget.
pub type FieldOverrides = IndexMap<String, Map<String, Value>>;

/// Registry of widget configs, keyed by widget name.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct WidgetConfigRegistry {
    fields: Arc<FieldSchemaRegistry>,
    widgets: IndexMap<String, RegisteredWidget>,
}

impl WidgetConfigRegistry {
    /// Create an empty registry resolving fields against `fields`.
    #[must_use]
    pub fn new(fields: Arc<FieldSchemaRegistry>) -> Self {
        Self {
            fields,
            widgets: IndexMap::new(),
        }
    }

    /// Create a registry holding every built-in widget.
    ///
    /// # Errors
    ///
    /// Any registration error of a built-in config.
    pub fn with_builtin(fields: Arc<FieldSchemaRegistry>) -> RegistryResult<Self> {
        let mut registry = Self::new(fields);
        for config in builtin_widgets() {
            registry.register(config)?;
        }
        debug!(count = registry.len(), "widget config registry populated");
        Ok(registry)
    }

    /// The field schema registry used for resolution.
    #[must_use]
    pub fn field_schemas(&self) -> &FieldSchemaRegistry {
        &self.fields
    }

    /// Register a widget config.
    ///
    /// # Errors
    ///
    /// `DuplicateWidget`, `MissingRequiredFields` for a data-consuming
    /// widget without required fields, or any error of
    /// [`integrate_fields_schema`].
    pub fn register(&mut self, config: WidgetConfig) -> RegistryResult<&RegisteredWidget> {
        let name = config.widget_name.clone();
        if self.widgets.contains_key(&name) {
            return Err(RegistryError::DuplicateWidget(name));
        }
        if config.meta.consumes_data && config.required_fields_schema.is_empty() {
            return Err(RegistryError::MissingRequiredFields(name));
        }

        let fields = integrate_fields_schema(&config, &self.fields)?;
        debug!(widget = %name, fields = fields.len(), "registered widget");
        let (index, _) = self
            .widgets
            .insert_full(name, RegisteredWidget { config, fields });
        Ok(&self.widgets[index])
    }

    /// Look up a widget by name.
    ///
    /// # Errors
    ///
    /// `UnknownWidget` when no config has this name.
    pub fn get_widget_config(&self, name: &str) -> RegistryResult<&RegisteredWidget> {
        self.widgets
            .get(name)
            .ok_or_else(|| RegistryError::UnknownWidget(name.to_string()))
    }

    /// A copy of widget `name` with extra option overrides merged in.
    ///
    /// The registered entry is left untouched.
    ///
    /// # Errors
    ///
    /// `UnknownWidget`, `UnknownFieldKey` for an override of an undeclared
    /// key, or `InvalidField` when an override is rejected.
    pub fn with_overrides(&self, name: &str, overrides: &FieldOverrides) -> RegistryResult<RegisteredWidget> {
        let registered = self.get_widget_config(name)?;
        let mut config = registered.config.clone();

        for (key, extra) in overrides {
            let instance = config
                .required_fields_schema
                .get_mut(key)
                .or_else(|| config.optional_fields_schema.get_mut(key))
                .ok_or_else(|| RegistryError::UnknownFieldKey {
                    widget: name.to_string(),
                    key: key.clone(),
                })?;
            for (option, value) in extra {
                instance.options.insert(option.clone(), value.clone());
            }
        }

        let fields = integrate_fields_schema(&config, &self.fields)?;
        Ok(RegisteredWidget { config, fields })
    }

    /// Check if a widget is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    /// Registered widget names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }

    /// Registered widgets, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredWidget> {
        self.widgets.values()
    }

    /// Number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetMeta;
    use dash_fields::{FieldOptions, FieldType};
    use serde_json::json;

    fn registry() -> WidgetConfigRegistry {
        WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new())).unwrap()
    }

    #[test]
    fn test_builtin_widgets_registered() {
        let registry = registry();
        assert_eq!(registry.len(), 14);
        for name in ["table", "lineChart", "geoMap", "sankeyChart"] {
            assert!(registry.contains(name), "{name} missing");
        }
    }

    #[test]
    fn test_unknown_widget() {
        let err = registry().get_widget_config("sparkline").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownWidget(ref n) if n == "sparkline"));
    }

    #[test]
    fn test_duplicate_widget() {
        let mut registry = registry();
        let config = registry.get_widget_config("lineChart").unwrap().config().clone();
        assert!(matches!(
            registry.register(config),
            Err(RegistryError::DuplicateWidget(_))
        ));
    }

    #[test]
    fn test_data_widget_needs_required_fields() {
        let mut registry = WidgetConfigRegistry::new(Arc::new(FieldSchemaRegistry::new()));
        let config = WidgetConfig::new("empty", WidgetMeta::new("Empty"));
        assert!(matches!(
            registry.register(config),
            Err(RegistryError::MissingRequiredFields(_))
        ));

        let static_text = WidgetConfig::new("note", WidgetMeta::new("Note").with_consumes_data(false))
            .optional("widgetHeader", FieldType::WidgetHeader, Value::Null);
        assert!(registry.register(static_text).is_ok());
    }

    #[test]
    fn test_with_overrides_leaves_registered_entry() {
        let registry = registry();
        let mut overrides = FieldOverrides::new();
        let mut x_axis = Map::new();
        x_axis.insert("max".into(), json!(3));
        overrides.insert("xAxis".into(), x_axis);

        let merged = registry.with_overrides("lineChart", &overrides).unwrap();
        let FieldOptions::Axis(axis) = &merged.field("xAxis").unwrap().options else {
            panic!("xAxis should resolve to axis options");
        };
        assert_eq!(axis.max, Some(3));

        let original = registry.get_widget_config("lineChart").unwrap();
        let FieldOptions::Axis(axis) = &original.field("xAxis").unwrap().options else {
            panic!("xAxis should resolve to axis options");
        };
        assert_ne!(axis.max, Some(3));
    }

    #[test]
    fn test_with_overrides_unknown_key() {
        let mut overrides = FieldOverrides::new();
        overrides.insert("sparkline".into(), Map::new());
        assert!(matches!(
            registry().with_overrides("lineChart", &overrides),
            Err(RegistryError::UnknownFieldKey { .. })
        ));
    }

    #[test]
    fn test_required_optional_disjoint_for_builtin() {
        for widget in registry().iter() {
            let config = widget.config();
            for key in config.required_fields_schema.keys() {
                assert!(!config.optional_fields_schema.contains_key(key));
            }
            if config.meta.consumes_data {
                assert!(widget.required_fields().next().is_some());
            }
        }
    }
}
