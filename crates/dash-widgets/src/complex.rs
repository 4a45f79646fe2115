//! Checks spanning several fields of one widget.

use std::collections::HashSet;

use dash_fields::{
    DataTarget, FieldErrorReason, FieldOptions, FieldType, ResolvedFieldSchema,
    ValidationBuilder, WidgetFieldValueMap,
};
use serde_json::Value;

use crate::builtin::XY_CHARTS;
use crate::registry::RegisteredWidget;

/// The column picked by a dynamic `tableDataField`, with its field.
fn dynamic_column<'a>(
    widget: &'a RegisteredWidget,
    values: &'a WidgetFieldValueMap,
) -> Option<(&'a ResolvedFieldSchema, &'a str)> {
    widget
        .fields()
        .values()
        .filter(|field| field.field_type == FieldType::TableDataField)
        .find_map(|field| {
            let value = values.get(&field.key)?;
            let kind = value.attribute("fieldType").and_then(Value::as_str);
            if kind != Some("dynamicField") {
                return None;
            }
            value.columns().first().copied().map(|column| (field, column))
        })
}

fn check_geo_map(widget: &RegisteredWidget, values: &WidgetFieldValueMap, errors: &mut ValidationBuilder) {
    for field in widget.fields().values() {
        let FieldOptions::GroupBy(options) = &field.options else {
            continue;
        };
        let (Some(fixed), Some(value)) = (&options.fixed_value, values.get(&field.key)) else {
            continue;
        };
        if !value.selects(fixed) && !errors.has_error_for(&field.key) {
            errors.reject(field, FieldErrorReason::Conflict);
        }
    }
}

fn check_table(widget: &RegisteredWidget, values: &WidgetFieldValueMap, errors: &mut ValidationBuilder) {
    let Some((data_field, column)) = dynamic_column(widget, values) else {
        return;
    };
    let grouped = widget
        .fields()
        .values()
        .filter(|field| field.field_type == FieldType::GroupBy)
        .filter_map(|field| values.get(&field.key))
        .any(|value| value.selects(column));
    if grouped {
        errors.reject(data_field, FieldErrorReason::Conflict);
    }
}

fn check_xy_chart(widget: &RegisteredWidget, values: &WidgetFieldValueMap, errors: &mut ValidationBuilder) {
    let Some((data_field, column)) = dynamic_column(widget, values) else {
        return;
    };
    let on_axis = widget
        .fields()
        .values()
        .filter(|field| matches!(field.field_type, FieldType::XAxis | FieldType::YAxis))
        .filter_map(|field| values.get(&field.key))
        .any(|value| value.selects(column));
    if on_axis {
        errors.reject(data_field, FieldErrorReason::Conflict);
    }
}

/// Two label mapping fields may not pick the same column. The later field
/// in schema order carries the conflict.
fn check_distinct_labels(widget: &RegisteredWidget, values: &WidgetFieldValueMap, errors: &mut ValidationBuilder) {
    let mut seen: HashSet<&str> = HashSet::new();
    for field in widget.fields().values() {
        let Some(constraints) = field.options.constraints() else {
            continue;
        };
        if constraints.data_target != DataTarget::LabelsInfo || errors.has_error_for(&field.key) {
            continue;
        }
        let Some(value) = values.get(&field.key) else {
            continue;
        };
        let columns = value.columns();
        if columns.iter().any(|column| seen.contains(column)) {
            errors.reject(field, FieldErrorReason::Conflict);
            continue;
        }
        seen.extend(columns);
    }
}

/// Run the cross-field checks of `widget`, recording each conflict in `errors`.
///
/// A `table` may not group by its dynamic data column and an XY chart may
/// not use an axis column as dynamic data column. Every other widget may
/// not pick one label column twice, and a `geoMap` must group by its fixed
/// value.
///
/// Nothing is checked until every required key carries a value: missing
/// required values are already reported and conflicts would only repeat
/// them.
pub fn check_cross_fields(
    widget: &RegisteredWidget,
    values: &WidgetFieldValueMap,
    errors: &mut ValidationBuilder,
) {
    let complete = widget
        .required_fields()
        .all(|field| values.get(&field.key).is_some_and(|v| !v.is_empty()));
    if !complete {
        return;
    }

    // Table and XY charts have their own label rule in place of distinct labels.
    match widget.name() {
        "table" => check_table(widget, values, errors),
        name if XY_CHARTS.contains(&name) => check_xy_chart(widget, values, errors),
        name => {
            if name == "geoMap" {
                check_geo_map(widget, values, errors);
            }
            check_distinct_labels(widget, values, errors);
        }
    }
}
