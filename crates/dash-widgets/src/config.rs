//! Declarative widget configs.

use dash_fields::{FieldSchemaMap, FieldSchemaRegistry, FieldType, ResolvedFieldSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RegistryError, RegistryResult};

/// Board sizes a widget can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    /// Half width.
    Md,
    /// Full width.
    Full,
}

/// Presentation metadata of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMeta {
    /// Display title.
    pub title: String,
    /// Allowed sizes.
    #[serde(default = "default_sizes")]
    pub sizes: Vec<WidgetSize>,
    /// Whether the widget renders a data table.
    #[serde(default = "default_consumes_data")]
    pub consumes_data: bool,
}

fn default_sizes() -> Vec<WidgetSize> {
    vec![WidgetSize::Full]
}

const fn default_consumes_data() -> bool {
    true
}

impl WidgetMeta {
    /// Metadata of a full-width, data-consuming widget.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sizes: default_sizes(),
            consumes_data: true,
        }
    }

    /// Set the allowed sizes.
    #[must_use]
    pub fn with_sizes(mut self, sizes: impl Into<Vec<WidgetSize>>) -> Self {
        self.sizes = sizes.into();
        self
    }

    /// Set whether the widget consumes data.
    #[must_use]
    pub const fn with_consumes_data(mut self, consumes_data: bool) -> Self {
        self.consumes_data = consumes_data;
        self
    }
}

/// One field slot of a widget config: its type and option overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchemaInstance {
    /// Field type.
    pub field_type: FieldType,
    /// Overrides applied over the field type's default options.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl FieldSchemaInstance {
    /// A field with the type's default options.
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            options: Map::new(),
        }
    }

    /// Set option overrides. A non-object value clears them.
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }
}

/// Declarative description of one widget.
///
/// Never mutated after registration; overrides produce new merged schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Unique widget name, e.g. `lineChart`.
    pub widget_name: String,
    /// Presentation metadata.
    pub meta: WidgetMeta,
    /// Fields that must carry a value before the widget can be saved.
    #[serde(default)]
    pub required_fields_schema: IndexMap<String, FieldSchemaInstance>,
    /// Fields that fall back to their defaults.
    #[serde(default)]
    pub optional_fields_schema: IndexMap<String, FieldSchemaInstance>,
}

impl WidgetConfig {
    /// Create a config with no fields.
    #[must_use]
    pub fn new(widget_name: impl Into<String>, meta: WidgetMeta) -> Self {
        Self {
            widget_name: widget_name.into(),
            meta,
            required_fields_schema: IndexMap::new(),
            optional_fields_schema: IndexMap::new(),
        }
    }

    /// Add a required field.
    #[must_use]
    pub fn required(mut self, key: impl Into<String>, field_type: FieldType, options: Value) -> Self {
        self.required_fields_schema
            .insert(key.into(), FieldSchemaInstance::new(field_type).with_options(options));
        self
    }

    /// Add an optional field.
    #[must_use]
    pub fn optional(mut self, key: impl Into<String>, field_type: FieldType, options: Value) -> Self {
        self.optional_fields_schema
            .insert(key.into(), FieldSchemaInstance::new(field_type).with_options(options));
        self
    }

    /// Field declaration for `key`, required or optional.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSchemaInstance> {
        self.required_fields_schema
            .get(key)
            .or_else(|| self.optional_fields_schema.get(key))
    }
}

/// Merge the required and optional schemas of `config` into one ordered lookup.
///
/// Required fields come first. Each field's options are resolved against
/// the field type's defaults.
///
/// # Errors
///
/// `DuplicateFieldKey` when a key is in both schemas, `InvalidField` when a
/// field type is unknown or an override is rejected.
pub fn integrate_fields_schema(
    config: &WidgetConfig,
    fields: &FieldSchemaRegistry,
) -> RegistryResult<FieldSchemaMap> {
    let widget = config.widget_name.as_str();
    let declared = config
        .required_fields_schema
        .iter()
        .map(|(key, instance)| (key, instance, true))
        .chain(
            config
                .optional_fields_schema
                .iter()
                .map(|(key, instance)| (key, instance, false)),
        );

    let mut merged = FieldSchemaMap::new();
    for (key, instance, required) in declared {
        if merged.contains_key(key) {
            return Err(RegistryError::DuplicateFieldKey {
                widget: widget.to_string(),
                key: key.clone(),
            });
        }
        let options = fields
            .get_field_schema(instance.field_type.name())
            .and_then(|schema| schema.resolve_options(&instance.options))
            .map_err(|source| RegistryError::invalid_field(widget, source))?;
        merged.insert(
            key.clone(),
            ResolvedFieldSchema::new(key.clone(), instance.field_type.clone(), options, required),
        );
    }
    Ok(merged)
}
