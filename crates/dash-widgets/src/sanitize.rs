//! Repair of stored widget values against the current data table.

use dash_fields::{
    FieldOptions, FieldType, FieldValue, ResolvedFieldSchema, TableColumns, WidgetFieldValueMap,
    default_value, suggest_value,
};
use dash_tables::operator::TransformOptions;
use dash_tables::{DataTable, TableOptions};
use serde_json::{Value, json};
use tracing::debug;

use crate::manager::ManagerConfig;
use crate::registry::RegisteredWidget;

/// Key kept on every widget, declared or not.
pub const WIDGET_HEADER_KEY: &str = "widgetHeader";

/// Column names of a data table.
#[must_use]
pub fn table_columns(table: &DataTable) -> TableColumns {
    TableColumns::new(table.data_columns(), table.label_columns())
}

fn pivot_column(table: &DataTable) -> Option<&str> {
    match &table.options {
        TableOptions::Transform(TransformOptions::Pivot(pivot)) if !pivot.fields.column.is_empty() => {
            Some(pivot.fields.column.as_str())
        }
        _ => None,
    }
}

/// Keep the selected columns that still exist. A single selection that
/// vanished moves to the first available column.
fn retain_columns(data: &Value, multi_selectable: bool, available: &[String]) -> Value {
    let exists = |column: &str| available.iter().any(|c| c == column);
    if multi_selectable {
        let kept: Vec<&str> = match data {
            Value::Array(items) => items.iter().filter_map(Value::as_str).filter(|c| exists(c)).collect(),
            Value::String(column) if exists(column) => vec![column.as_str()],
            _ => Vec::new(),
        };
        return json!(kept);
    }
    let current = match data {
        Value::String(column) => Some(column.as_str()),
        Value::Array(items) if items.len() == 1 => items[0].as_str(),
        _ => None,
    };
    match current.filter(|c| exists(c)).or_else(|| available.first().map(String::as_str)) {
        Some(column) => json!(column),
        None => Value::Null,
    }
}

/// Give a counted group-by value its `count` when it carries none.
fn fill_group_by_count(field: &ResolvedFieldSchema, value: &mut FieldValue, config: &ManagerConfig) {
    if let FieldOptions::GroupBy(o) = &field.options {
        if !o.hide_count && value.count().is_none() {
            let count = o.default_max_count.unwrap_or(config.default_group_by_count);
            value.attributes.insert("count".into(), json!(count));
        }
    }
}

fn repair(field: &ResolvedFieldSchema, mut value: FieldValue, table: &DataTable, columns: &TableColumns) -> FieldValue {
    match &field.options {
        FieldOptions::Data(o) => {
            value.data = match pivot_column(table) {
                Some(column) if o.multi_selectable => json!([column]),
                Some(column) => json!(column),
                None => retain_columns(&value.data, o.multi_selectable, columns.columns(o.data_target)),
            };
        }
        FieldOptions::TableData(o) => {
            let dynamic = value.attribute("fieldType").and_then(Value::as_str) == Some("dynamicField");
            value.data = if dynamic {
                retain_columns(&value.data, false, &columns.labels_info)
            } else {
                retain_columns(&value.data, o.multi_selectable, columns.columns(o.data_target))
            };
        }
        FieldOptions::Label(o) => {
            value.data = retain_columns(&value.data, o.multi_selectable, columns.columns(o.data_target));
        }
        FieldOptions::Axis(o) => {
            value.data = retain_columns(&value.data, o.multi_selectable, columns.columns(o.data_target));
        }
        FieldOptions::GroupBy(o) => {
            value.data = retain_columns(&value.data, o.multi_selectable, columns.columns(o.data_target));
            if o.hide_count {
                value.attributes.remove("count");
            }
        }
        FieldOptions::SankeyDimensions(o) => {
            value.data = retain_columns(&value.data, true, columns.columns(o.data_target));
        }
        FieldOptions::FormatRules(o) if o.use_field => {
            let available = columns.columns(o.data_target);
            let current = value.attribute("field").and_then(Value::as_str);
            if !current.is_some_and(|f| available.iter().any(|c| c == f)) {
                match available.first() {
                    Some(first) => {
                        value.attributes.insert("field".into(), json!(first));
                    }
                    None => {
                        value.attributes.remove("field");
                    }
                }
            }
        }
        _ if field.field_type == FieldType::CustomTableColumnWidth => {
            if let Some(Value::Array(infos)) = value.attributes.get_mut("widthInfos") {
                infos.retain(|info| {
                    info.get("fieldKey")
                        .and_then(Value::as_str)
                        .is_some_and(|key| columns.contains(key))
                });
            }
        }
        _ => {}
    }
    value
}

/// Clean the stored `values` of `widget` against its backing `table`.
///
/// Keys outside the schema are dropped, except the widget header. Values
/// of table-affected fields whose columns disappeared are repaired. Absent
/// keys are filled with suggestions derived from the table, or with the
/// static default when there is no table. Group-by fields without a
/// declared top-N get `config.default_group_by_count`, as the manager does.
#[must_use]
pub fn sanitize_field_values(
    widget: &RegisteredWidget,
    values: &WidgetFieldValueMap,
    table: Option<&DataTable>,
    config: &ManagerConfig,
) -> WidgetFieldValueMap {
    let columns = table.map(table_columns);
    let mut sanitized = WidgetFieldValueMap::new();

    for field in widget.fields().values() {
        let supplied = values.get(&field.key).filter(|v| !v.is_empty());
        let value = match (supplied, table, &columns) {
            (Some(value), Some(table), Some(columns)) => Some(repair(field, value.clone(), table, columns)),
            (Some(value), _, _) => Some(value.clone()),
            (None, _, Some(columns)) => suggest_value(&field.field_type, &field.options, columns),
            (None, _, None) => default_value(&field.field_type, &field.options),
        };
        if let Some(mut value) = value {
            fill_group_by_count(field, &mut value, config);
            sanitized.insert(field.key.clone(), value);
        }
    }

    if let Some(header) = values.get(WIDGET_HEADER_KEY) {
        if !sanitized.contains_key(WIDGET_HEADER_KEY) {
            sanitized.insert(WIDGET_HEADER_KEY.to_string(), header.clone());
        }
    }

    let dropped = values.keys().filter(|key| !sanitized.contains_key(*key)).count();
    debug!(
        widget = widget.name(),
        kept = sanitized.len(),
        dropped,
        "sanitized widget values"
    );
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WidgetConfig, WidgetMeta};
    use crate::manager::FieldValueManager;
    use crate::registry::WidgetConfigRegistry;
    use dash_fields::{FieldSchemaRegistry, ValidatorRegistry};
    use dash_tables::operator::{PivotFields, PivotOptions};
    use dash_tables::{AddOptions, DataSource};
    use std::sync::Arc;

    fn registry() -> WidgetConfigRegistry {
        WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new())).unwrap()
    }

    fn sanitize(
        widget: &RegisteredWidget,
        values: &WidgetFieldValueMap,
        table: Option<&DataTable>,
    ) -> WidgetFieldValueMap {
        sanitize_field_values(widget, values, table, &ManagerConfig::default())
    }

    fn cost_table() -> DataTable {
        DataTable::added(
            "T1",
            "Cost",
            AddOptions::new(DataSource::UnifiedCost {
                data_key: "cost".into(),
            }),
        )
        .with_data_info(["cost", "usage"])
        .with_labels_info(["Region", "Provider"])
    }

    #[test]
    fn test_drops_unknown_keys_keeps_header() {
        let registry = registry();
        let widget = registry.get_widget_config("numberCard").unwrap();
        let mut values = WidgetFieldValueMap::new();
        values.insert("dataField".into(), FieldValue::new().with_data("cost"));
        values.insert("xAxis".into(), FieldValue::new().with_data("Region"));
        values.insert(
            WIDGET_HEADER_KEY.into(),
            FieldValue::new().with_attribute("toggleValue", true).with_attribute("title", "Spend"),
        );

        let sanitized = sanitize(widget, &values, Some(&cost_table()));
        assert!(!sanitized.contains_key("xAxis"));
        assert_eq!(sanitized[WIDGET_HEADER_KEY].attribute("title"), Some(&json!("Spend")));
        assert_eq!(sanitized["dataField"].data, json!("cost"));
    }

    #[test]
    fn test_repairs_vanished_columns() {
        let registry = registry();
        let widget = registry.get_widget_config("table").unwrap();
        let mut values = WidgetFieldValueMap::new();
        values.insert(
            "tableDataField".into(),
            FieldValue::new().with_data(json!(["cost", "gone"])).with_version("v1"),
        );
        values.insert("groupBy".into(), FieldValue::new().with_data(json!(["Region", "Account"])));
        values.insert(
            "customTableColumnWidth".into(),
            FieldValue::new().with_attribute(
                "widthInfos",
                json!([{"fieldKey": "cost", "width": 120}, {"fieldKey": "gone", "width": 80}]),
            ),
        );

        let sanitized = sanitize(widget, &values, Some(&cost_table()));
        assert_eq!(sanitized["tableDataField"].data, json!(["cost"]));
        assert_eq!(sanitized["groupBy"].data, json!(["Region"]));
        assert!(sanitized["groupBy"].count().is_none());
        assert_eq!(
            sanitized["customTableColumnWidth"].attribute("widthInfos"),
            Some(&json!([{"fieldKey": "cost", "width": 120}]))
        );
    }

    #[test]
    fn test_single_axis_moves_to_first_column() {
        let registry = registry();
        let widget = registry.get_widget_config("lineChart").unwrap();
        let mut values = WidgetFieldValueMap::new();
        values.insert("xAxis".into(), FieldValue::new().with_data("Account").with_attribute("count", 5));

        let sanitized = sanitize(widget, &values, Some(&cost_table()));
        assert_eq!(sanitized["xAxis"].data, json!("Region"));
        assert_eq!(sanitized["xAxis"].count(), Some(&json!(5)));
    }

    #[test]
    fn test_fills_absent_keys_from_table() {
        let registry = registry();
        let widget = registry.get_widget_config("pieChart").unwrap();
        let sanitized = sanitize(widget, &WidgetFieldValueMap::new(), Some(&cost_table()));
        assert_eq!(sanitized["dataField"].data, json!("cost"));
        assert_eq!(sanitized["groupBy"].data, json!("Region"));
        assert_eq!(sanitized["groupBy"].count(), Some(&json!(5)));
    }

    #[test]
    fn test_configured_group_by_count_is_a_fixpoint() {
        let mut registry = WidgetConfigRegistry::new(Arc::new(FieldSchemaRegistry::new()));
        let config = WidgetConfig::new("ranking", WidgetMeta::new("Ranking"))
            .required("dataField", FieldType::DataField, Value::Null)
            .required("groupBy", FieldType::GroupBy, json!({"max": 20}));
        let widget = registry.register(config).unwrap().clone();
        let manager = FieldValueManager::new(
            Arc::new(ValidatorRegistry::new()),
            ManagerConfig::default().with_default_group_by_count(7),
        );

        let mut values = WidgetFieldValueMap::new();
        values.insert("groupBy".into(), FieldValue::new().with_data("Account"));
        let sanitized = sanitize_field_values(&widget, &values, Some(&cost_table()), manager.config());
        assert_eq!(sanitized["groupBy"].data, json!("Region"));
        assert_eq!(sanitized["groupBy"].count(), Some(&json!(7)));

        let build = manager.build_field_value_map(&widget, &sanitized);
        assert!(build.save_ready, "errors: {:?}", build.errors);
        assert_eq!(build.map, sanitized);
    }

    #[test]
    fn test_without_table_only_static_defaults() {
        let registry = registry();
        let widget = registry.get_widget_config("pieChart").unwrap();
        let sanitized = sanitize(widget, &WidgetFieldValueMap::new(), None);
        assert!(!sanitized.contains_key("dataField"));
        assert!(sanitized.contains_key("legend"));
    }

    #[test]
    fn test_pivot_table_data_field() {
        let registry = registry();
        let widget = registry.get_widget_config("numberCard").unwrap();
        let pivot = DataTable::transformed(
            "T2",
            "Pivot",
            TransformOptions::Pivot(PivotOptions {
                data_table_id: Some("T1".into()),
                fields: PivotFields {
                    labels: vec!["Region".into()],
                    column: "Provider".into(),
                    data: "cost".into(),
                },
                ..PivotOptions::default()
            }),
        );
        let mut values = WidgetFieldValueMap::new();
        values.insert("dataField".into(), FieldValue::new().with_data("cost"));

        let sanitized = sanitize(widget, &values, Some(&pivot));
        assert_eq!(sanitized["dataField"].data, json!("Provider"));
    }
}
