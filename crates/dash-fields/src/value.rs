//! Field values as supplied by dashboard authors and persisted on widgets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field_type::DataTarget;

/// Ordered `fieldKey -> FieldValue` map persisted as a widget's options.
pub type WidgetFieldValueMap = IndexMap<String, FieldValue>;

/// The value supplied for one field key.
///
/// `data` holds the selected column(s) for mapping fields. Every other
/// per-type property (`count`, `toggleValue`, `rules`, ...) lives in
/// `attributes` and is flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    /// Selected column name, or array of names.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// Schema version for versioned field types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Type-specific attributes.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl FieldValue {
    /// Create an empty value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data payload.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set one attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get one attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The `count` attribute, when present.
    #[must_use]
    pub fn count(&self) -> Option<&Value> {
        self.attribute("count")
    }

    /// Check if `data` carries a selection.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !is_blank(&self.data)
    }

    /// Check if nothing at all was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_data() && self.version.is_none() && self.attributes.is_empty()
    }

    /// Column names selected in `data`.
    ///
    /// A scalar string yields one column. Non-string entries are skipped.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        match &self.data {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Check if `data` selects the given column.
    #[must_use]
    pub fn selects(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Fill `data`, `version` and attributes that are absent here from `defaults`.
    ///
    /// Supplied properties are never overwritten.
    pub fn fill_missing(&mut self, defaults: &Self) {
        if self.data.is_null() && !defaults.data.is_null() {
            self.data = defaults.data.clone();
        }
        if self.version.is_none() {
            self.version.clone_from(&defaults.version);
        }
        for (key, value) in &defaults.attributes {
            if !self.attributes.contains_key(key) {
                self.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    /// The whole value as one JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = self.attributes.clone();
        if !self.data.is_null() {
            object.insert("data".to_string(), self.data.clone());
        }
        if let Some(version) = &self.version {
            object.insert("version".to_string(), Value::String(version.clone()));
        }
        Value::Object(object)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Column names of the data table backing a widget.
///
/// Used to derive initial values and to repair values whose columns
/// disappeared from the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumns {
    /// Numeric data columns, in table order.
    pub data_info: Vec<String>,
    /// Label columns, in table order.
    pub labels_info: Vec<String>,
}

impl TableColumns {
    /// Create a column set.
    #[must_use]
    pub fn new<D, L>(data_info: D, labels_info: L) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            data_info: data_info.into_iter().map(Into::into).collect(),
            labels_info: labels_info.into_iter().map(Into::into).collect(),
        }
    }

    /// Columns of one family.
    #[must_use]
    pub fn columns(&self, target: DataTarget) -> &[String] {
        match target {
            DataTarget::DataInfo => &self.data_info,
            DataTarget::LabelsInfo => &self.labels_info,
        }
    }

    /// Check if a column exists in either family.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.data_info.iter().chain(&self.labels_info).any(|c| c == column)
    }
}
