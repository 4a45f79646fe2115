//! One-time migration of widget options stored by the legacy schema generation.
//!
//! Legacy options wrap every value in `{"value": ...}`, store bare scalars,
//! pair `dataField` with a series key instead of using `tableDataField`, and
//! keep `tableDataField` without a version or with nested
//! `staticFieldInfo` / `dynamicFieldInfo` records.

use dash_fields::constants::{DEFAULT_GROUP_BY_COUNT, TABLE_DATA_FIELD_CURRENT_VERSION};
use dash_fields::{FieldType, FieldValue, ResolvedFieldSchema, WidgetFieldValueMap};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::RegistryResult;
use crate::registry::{RegisteredWidget, WidgetConfigRegistry};

/// Legacy keys that split a chart's series, replaced by a dynamic `tableDataField`.
const LEGACY_SERIES_KEYS: [&str; 2] = ["lineBy", "stackBy"];

const TABLE_DATA_FIELD: &str = "tableDataField";
const DATA_FIELD: &str = "dataField";

/// Strip a `{"value": ...}` wrapper.
fn unwrap_value(raw: &Value) -> Value {
    match raw {
        Value::Object(map) if map.len() == 1 => map.get("value").cloned().unwrap_or_else(|| raw.clone()),
        other => other.clone(),
    }
}

fn object_to_value(map: Map<String, Value>) -> FieldValue {
    let mut value = FieldValue::new();
    for (key, item) in map {
        match (key.as_str(), item) {
            ("data", data) => value.data = data,
            ("version", Value::String(version)) => value.version = Some(version),
            (_, item) => {
                value.attributes.insert(key, item);
            }
        }
    }
    value
}

/// Shape a legacy payload as a field value of `field`.
fn reshape(field: Option<&ResolvedFieldSchema>, raw: Value) -> FieldValue {
    let raw = match raw {
        Value::Object(map) => return object_to_value(map),
        Value::Null => return FieldValue::new(),
        other => other,
    };
    let Some(field) = field else {
        return FieldValue::new().with_data(raw);
    };
    if field.options.constraints().is_some() {
        return FieldValue::new().with_data(raw);
    }
    let attribute = match field.field_type {
        _ if raw.is_boolean() => "toggleValue",
        FieldType::Granularity => "granularity",
        FieldType::DateFormat | FieldType::NumberFormat => "format",
        FieldType::MissingValue | FieldType::PieChartType | FieldType::WidgetHeight => "type",
        FieldType::DateRange => "value",
        FieldType::Max => "max",
        FieldType::Min => "min",
        FieldType::ColorSchema => "colorName",
        FieldType::WidgetHeader => "title",
        _ => return FieldValue::new().with_data(raw),
    };
    FieldValue::new().with_attribute(attribute, raw)
}

/// Move the attributes of a nested legacy record up into `value`.
fn flatten_info(value: &mut FieldValue, record: &str) {
    let Some(Value::Object(info)) = value.attributes.remove(record) else {
        return;
    };
    for (key, item) in info {
        if key == "fieldValue" {
            value.data = item;
        } else {
            value.attributes.insert(key, item);
        }
    }
}

/// Bring a `tableDataField` to the current version.
fn migrate_table_data_field(mut value: FieldValue) -> FieldValue {
    if value.version.as_deref() == Some(TABLE_DATA_FIELD_CURRENT_VERSION) {
        flatten_info(&mut value, "staticFieldInfo");
        flatten_info(&mut value, "dynamicFieldInfo");
        return value;
    }

    let legacy_columns = value.attributes.remove("value");
    let dynamic = value.attribute("fieldType").and_then(Value::as_str) == Some("dynamicField");
    if value.data.is_null() {
        value.data = legacy_columns.unwrap_or(Value::Null);
    }
    if dynamic {
        if let Some(fixed) = value.attributes.remove("dynamicFieldValue") {
            value.attributes.insert("fixedValue".into(), fixed);
        }
        value.attributes.entry("valueType").or_insert_with(|| json!("fixed"));
    } else {
        value.attributes.insert("fieldType".into(), json!("staticField"));
    }
    value.version = Some(TABLE_DATA_FIELD_CURRENT_VERSION.to_string());
    value
}

/// Replace a legacy `dataField` (and optional series key) with a `tableDataField`.
fn data_field_to_table_data_field(data_field: &FieldValue, series: Option<&FieldValue>) -> FieldValue {
    let columns = data_field.columns();
    let value = FieldValue::new().with_version(TABLE_DATA_FIELD_CURRENT_VERSION);
    match series.and_then(|s| s.columns().first().map(|c| (s, *c))) {
        Some((series, column)) => {
            let count = series
                .count()
                .cloned()
                .unwrap_or_else(|| json!(DEFAULT_GROUP_BY_COUNT));
            value
                .with_data(column)
                .with_attribute("fieldType", "dynamicField")
                .with_attribute("criteria", columns.first().copied().unwrap_or_default())
                .with_attribute("valueType", "auto")
                .with_attribute("count", count)
        }
        None => value
            .with_data(json!(columns))
            .with_attribute("fieldType", "staticField"),
    }
}

fn migrate_header(value: &mut FieldValue) {
    if value.attribute("toggleValue").is_none() {
        let titled = value
            .attribute("title")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        value.attributes.insert("toggleValue".into(), Value::Bool(titled));
    }
}

fn migrate_widget(widget: &RegisteredWidget, legacy: &Map<String, Value>) -> WidgetFieldValueMap {
    let mut values: WidgetFieldValueMap = legacy
        .iter()
        .map(|(key, raw)| (key.clone(), reshape(widget.field(key), unwrap_value(raw))))
        .collect();

    let needs_table_data_field =
        widget.field(TABLE_DATA_FIELD).is_some() && widget.field(DATA_FIELD).is_none();
    if needs_table_data_field {
        if let Some(data_field) = values.shift_remove(DATA_FIELD) {
            let series = LEGACY_SERIES_KEYS
                .iter()
                .filter(|key| widget.field(key).is_none())
                .find_map(|key| values.get(*key).filter(|v| v.has_data()));
            let migrated = data_field_to_table_data_field(&data_field, series);
            values.insert(TABLE_DATA_FIELD.to_string(), migrated);
        }
    }
    if let Some(value) = values.shift_remove(TABLE_DATA_FIELD) {
        values.insert(TABLE_DATA_FIELD.to_string(), migrate_table_data_field(value));
    }
    if let Some(header) = values.get_mut("widgetHeader") {
        migrate_header(header);
    }
    if let Some(legend) = values.get_mut("legend") {
        legend.attributes.entry("toggleValue").or_insert(Value::Bool(true));
    }

    widget
        .fields()
        .keys()
        .filter_map(|key| values.shift_remove(key).map(|value| (key.clone(), value)))
        .collect()
}

/// Convert legacy options of a `widget_type` widget to the current value map.
///
/// Keys the widget no longer declares are dropped. The result is ordered by
/// the widget's schema.
///
/// # Errors
///
/// `UnknownWidget` when `widget_type` is not registered.
pub fn migrate_legacy_options(
    registry: &WidgetConfigRegistry,
    widget_type: &str,
    legacy: &Map<String, Value>,
) -> RegistryResult<WidgetFieldValueMap> {
    let widget = registry.get_widget_config(widget_type)?;
    let migrated = migrate_widget(widget, legacy);
    debug!(
        widget = widget_type,
        legacy_keys = legacy.len(),
        migrated_keys = migrated.len(),
        "migrated legacy widget options"
    );
    Ok(migrated)
}
