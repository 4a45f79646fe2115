//! Field schemas and the registry that owns them.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::TABLE_DATA_FIELD_VERSIONS;
use crate::defaults;
use crate::error::{FieldResult, FieldSchemaError};
use crate::field_type::FieldType;
use crate::options::FieldOptions;
use crate::value::{FieldValue, TableColumns};

/// Declarative description of one field type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    field_type: FieldType,
    defaults: FieldOptions,
    versions: Vec<String>,
}

impl FieldSchema {
    /// Schema of a built-in field type.
    #[must_use]
    pub fn builtin(field_type: FieldType) -> Self {
        let versions = if matches!(field_type, FieldType::TableDataField) {
            TABLE_DATA_FIELD_VERSIONS.iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };
        Self {
            defaults: FieldOptions::defaults_for(&field_type),
            field_type,
            versions,
        }
    }

    /// Schema of an application-registered field type.
    #[must_use]
    pub fn custom(name: impl Into<String>, default_options: Map<String, Value>) -> Self {
        Self {
            field_type: FieldType::Custom(name.into()),
            defaults: FieldOptions::Custom(default_options),
            versions: Vec::new(),
        }
    }

    /// The field type.
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Option defaults of the type.
    #[must_use]
    pub fn default_options(&self) -> &FieldOptions {
        &self.defaults
    }

    /// Merge widget-supplied overrides over the type defaults.
    pub fn resolve_options(&self, overrides: &Map<String, Value>) -> FieldResult<FieldOptions> {
        self.defaults.merge(&self.field_type, overrides)
    }

    /// The static default value under the given options.
    #[must_use]
    pub fn default_value(&self, options: &FieldOptions) -> Option<FieldValue> {
        defaults::default_value(&self.field_type, options)
    }

    /// A table-derived initial value under the given options.
    #[must_use]
    pub fn suggest_value(&self, options: &FieldOptions, columns: &TableColumns) -> Option<FieldValue> {
        defaults::suggest_value(&self.field_type, options, columns)
    }

    /// Versions a value of this type may carry. Empty for unversioned types.
    #[must_use]
    pub fn supported_versions(&self) -> &[String] {
        &self.versions
    }

    /// Check if values of this type carry a version.
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        !self.versions.is_empty()
    }
}

/// A field of a specific widget with its options fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFieldSchema {
    /// Field key within the widget.
    pub key: String,
    /// Field type.
    pub field_type: FieldType,
    /// Effective options.
    pub options: FieldOptions,
    /// Whether the key is in the required schema.
    pub required: bool,
}

impl ResolvedFieldSchema {
    /// Create a resolved field.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        field_type: FieldType,
        options: FieldOptions,
        required: bool,
    ) -> Self {
        Self {
            key: key.into(),
            field_type,
            options,
            required,
        }
    }
}

/// Ordered `fieldKey -> ResolvedFieldSchema` lookup of one widget.
pub type FieldSchemaMap = IndexMap<String, ResolvedFieldSchema>;

/// Registry of every known field type.
///
/// Populated once at startup and shared read-only afterwards.
///
/// # Example
///
/// ```
/// use dash_fields::FieldSchemaRegistry;
///
/// let registry = FieldSchemaRegistry::new();
/// let schema = registry.get_field_schema("xAxis")?;
/// assert!(!schema.is_versioned());
/// assert!(registry.get_field_schema("sparkline").is_err());
/// # Ok::<(), dash_fields::FieldSchemaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FieldSchemaRegistry {
    schemas: IndexMap<String, FieldSchema>,
}

impl FieldSchemaRegistry {
    /// Create a registry with every built-in field type.
    #[must_use]
    pub fn new() -> Self {
        let schemas: IndexMap<String, FieldSchema> = FieldType::BUILTIN
            .into_iter()
            .map(|ft| (ft.name().to_string(), FieldSchema::builtin(ft)))
            .collect();
        debug!(count = schemas.len(), "field schema registry populated");
        Self { schemas }
    }

    /// Register an application field type.
    pub fn register_custom(
        &mut self,
        name: impl Into<String>,
        default_options: Map<String, Value>,
    ) -> FieldResult<&FieldSchema> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(FieldSchemaError::DuplicateFieldType(name));
        }
        debug!(field_type = %name, "registering custom field type");
        let schema = FieldSchema::custom(name.clone(), default_options);
        let entry = self.schemas.entry(name).or_insert(schema);
        Ok(entry)
    }

    /// Look up a field schema by type name.
    pub fn get_field_schema(&self, field_type: &str) -> FieldResult<&FieldSchema> {
        self.schemas
            .get(field_type)
            .ok_or_else(|| FieldSchemaError::UnknownFieldType(field_type.to_string()))
    }

    /// Look up a field schema by type.
    #[must_use]
    pub fn get(&self, field_type: &FieldType) -> Option<&FieldSchema> {
        self.schemas.get(field_type.name())
    }

    /// Check if a type name is registered.
    #[must_use]
    pub fn contains(&self, field_type: &str) -> bool {
        self.schemas.contains_key(field_type)
    }

    /// Registered field types, in registration order.
    pub fn field_types(&self) -> impl Iterator<Item = &FieldType> {
        self.schemas.values().map(FieldSchema::field_type)
    }

    /// Number of registered field types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for FieldSchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_has_every_builtin() {
        let registry = FieldSchemaRegistry::new();
        assert_eq!(registry.len(), FieldType::BUILTIN.len());
        for ft in FieldType::BUILTIN {
            assert!(registry.get(&ft).is_some(), "missing {ft}");
        }
    }

    #[test]
    fn test_unknown_field_type() {
        let registry = FieldSchemaRegistry::new();
        let err = registry.get_field_schema("sparkline").unwrap_err();
        assert_eq!(err, FieldSchemaError::UnknownFieldType("sparkline".into()));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = FieldSchemaRegistry::new();
        let mut defaults = Map::new();
        defaults.insert("threshold".into(), json!(10));

        registry.register_custom("sparkline", defaults).unwrap();

        let schema = registry.get_field_schema("sparkline").unwrap();
        assert!(schema.field_type().is_custom());
        let mut overrides = Map::new();
        overrides.insert("threshold".into(), json!(20));
        assert_eq!(
            schema.resolve_options(&overrides).unwrap(),
            FieldOptions::Custom(overrides.clone())
        );
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = FieldSchemaRegistry::new();
        let err = registry.register_custom("xAxis", Map::new()).unwrap_err();
        assert_eq!(err, FieldSchemaError::DuplicateFieldType("xAxis".into()));

        registry.register_custom("sparkline", Map::new()).unwrap();
        assert!(registry.register_custom("sparkline", Map::new()).is_err());
    }

    #[test]
    fn test_table_data_field_is_versioned() {
        let registry = FieldSchemaRegistry::new();
        let schema = registry.get_field_schema("tableDataField").unwrap();
        assert!(schema.is_versioned());
        assert_eq!(schema.supported_versions(), ["v1".to_string()]);
    }

    #[test]
    fn test_resolve_options_rejects_typo() {
        let registry = FieldSchemaRegistry::new();
        let schema = registry.get_field_schema("xAxis").unwrap();
        let mut overrides = Map::new();
        overrides.insert("defaultMaxcount".into(), json!(5));
        assert!(matches!(
            schema.resolve_options(&overrides),
            Err(FieldSchemaError::InvalidOptionKey { .. })
        ));
    }
}
