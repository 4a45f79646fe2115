//! Static default values and table-derived initial values.

use serde_json::{Value, json};

use crate::constants::{
    self, COMPARISON_DECREASE_COLOR, COMPARISON_INCREASE_COLOR, DATE_FIELD, GRAY_200, GRAY_900,
    TABLE_DATA_FIELD_CURRENT_VERSION,
};
use crate::field_type::FieldType;
use crate::options::FieldOptions;
use crate::value::{FieldValue, TableColumns};

/// The static default value of a field, honouring option-declared defaults.
///
/// Mapping fields have no static default: their initial value depends on the
/// backing table, see [`suggest_value`].
#[must_use]
pub fn default_value(field_type: &FieldType, options: &FieldOptions) -> Option<FieldValue> {
    let value = match (field_type, options) {
        (FieldType::ColorSchema, FieldOptions::ColorSchema(o)) => {
            let name = if constants::color_schema(&o.default).is_some() {
                o.default.as_str()
            } else {
                constants::DEFAULT_COLOR_SCHEMA
            };
            let colors = constants::color_schema(name).unwrap_or_default();
            FieldValue::new()
                .with_attribute("colorName", name)
                .with_attribute("colorValue", json!(colors))
        }
        (FieldType::Comparison, FieldOptions::Toggle(o)) => FieldValue::new()
            .with_attribute("toggleValue", o.default)
            .with_attribute("decreaseColor", COMPARISON_DECREASE_COLOR)
            .with_attribute("increaseColor", COMPARISON_INCREASE_COLOR)
            .with_attribute("format", "all"),
        (FieldType::Legend, FieldOptions::Legend(o)) => FieldValue::new()
            .with_attribute("toggleValue", o.toggle)
            .with_attribute("position", "right"),
        (FieldType::Icon, FieldOptions::Icon(o)) => FieldValue::new()
            .with_attribute("toggleValue", o.toggle)
            .with_attribute("icon", json!({ "name": o.default }))
            .with_attribute("color", GRAY_900),
        (FieldType::Max, FieldOptions::Bound(o)) => {
            FieldValue::new().with_attribute("max", o.default.unwrap_or(0.0))
        }
        (FieldType::Min, FieldOptions::Bound(o)) => {
            FieldValue::new().with_attribute("min", o.default.unwrap_or(0.0))
        }
        (FieldType::Granularity, FieldOptions::Choice(o)) => FieldValue::new().with_attribute(
            "granularity",
            o.default.as_deref().unwrap_or(constants::DEFAULT_GRANULARITY),
        ),
        (FieldType::DateRange, FieldOptions::Choice(o)) => FieldValue::new()
            .with_attribute("inherit", true)
            .with_attribute("value", o.default.as_deref().unwrap_or("auto")),
        (FieldType::DateFormat, FieldOptions::Choice(o)) => FieldValue::new().with_attribute(
            "format",
            o.default.as_deref().unwrap_or(constants::DEFAULT_DATE_FORMAT),
        ),
        (FieldType::NumberFormat, FieldOptions::Choice(o)) => match &o.default {
            Some(format) => FieldValue::new().with_attribute("format", format.as_str()),
            None => FieldValue::new().with_attribute("format", json!({})),
        },
        (
            FieldType::MissingValue | FieldType::PieChartType | FieldType::WidgetHeight,
            FieldOptions::Choice(o),
        ) => {
            let fallback = match field_type {
                FieldType::MissingValue => "lineToZero",
                FieldType::PieChartType => "pie",
                _ => "default",
            };
            FieldValue::new().with_attribute("type", o.default.as_deref().unwrap_or(fallback))
        }
        (FieldType::FormatRules, FieldOptions::FormatRules(o)) => FieldValue::new()
            .with_attribute("baseColor", o.base_color.as_deref().unwrap_or(GRAY_200))
            .with_attribute("rules", json!([])),
        (FieldType::TableColumnWidth, FieldOptions::TableColumnWidth(o)) => {
            let value = FieldValue::new()
                .with_attribute("minimumWidth", o.default_minimum_width);
            match o.default_fixed_width {
                Some(width) => value
                    .with_attribute("widthType", "fixed")
                    .with_attribute("fixedWidth", width),
                None => value.with_attribute("widthType", "auto"),
            }
        }
        (FieldType::CustomTableColumnWidth, _) => {
            FieldValue::new().with_attribute("widthInfos", json!([]))
        }
        (
            FieldType::TooltipNumberFormat
            | FieldType::WidgetHeader
            | FieldType::DisplaySeriesLabel
            | FieldType::DisplayAnnotation
            | FieldType::Total
            | FieldType::SubTotal
            | FieldType::TextWrap,
            FieldOptions::Toggle(o),
        ) => FieldValue::new().with_attribute("toggleValue", o.default),
        _ => return None,
    };
    Some(value)
}

/// Properties filled into a supplied value when the value does not carry them.
///
/// For non-mapping fields this is the static default. Mapping fields only
/// get their top-N `count` (from `defaultMaxCount`) and, for
/// `tableDataField`, the static field form.
#[must_use]
pub fn default_attributes(field_type: &FieldType, options: &FieldOptions) -> FieldValue {
    if let Some(constraints) = options.constraints() {
        let mut value = FieldValue::new();
        if constraints.uses_count && !constraints.hide_count {
            if let Some(count) = constraints.default_max_count {
                value = value.with_attribute("count", count);
            }
        }
        if matches!(field_type, FieldType::TableDataField) {
            value = value.with_attribute("fieldType", "staticField");
        }
        return value;
    }
    default_value(field_type, options).unwrap_or_default()
}

/// Initial value of a field derived from the columns of the backing table.
///
/// Mapping fields pick the first column of their data target (every column
/// when `allSelected`), top-N fields get `count = defaultMaxCount`, and
/// `formatRules` with `useField` targets the first column. Other fields fall
/// back to [`default_value`]. Returns `None` when the table offers nothing
/// to pick.
#[must_use]
pub fn suggest_value(
    field_type: &FieldType,
    options: &FieldOptions,
    columns: &TableColumns,
) -> Option<FieldValue> {
    match options {
        FieldOptions::Data(o) => {
            let available = columns.columns(o.data_target);
            let first = available.first()?;
            let data = if o.multi_selectable {
                let picked: Vec<&String> = if o.all_selected {
                    available.iter().take(o.max.unwrap_or(usize::MAX)).collect()
                } else {
                    vec![first]
                };
                json!(picked)
            } else {
                json!(first)
            };
            Some(FieldValue::new().with_data(data))
        }
        FieldOptions::TableData(o) => {
            let available = columns.columns(o.data_target);
            if available.is_empty() {
                return None;
            }
            let picked: Vec<&String> = available.iter().take(o.max.unwrap_or(usize::MAX)).collect();
            Some(
                FieldValue::new()
                    .with_data(json!(picked))
                    .with_version(TABLE_DATA_FIELD_CURRENT_VERSION)
                    .with_attribute("fieldType", "staticField"),
            )
        }
        FieldOptions::Label(o) => {
            let first = columns.columns(o.data_target).first()?;
            let data = if o.multi_selectable { json!([first]) } else { json!(first) };
            Some(FieldValue::new().with_data(data))
        }
        FieldOptions::Axis(o) => {
            let first = first_label(columns.columns(o.data_target), o.exclude_date_field)?;
            let data = if o.multi_selectable { json!([first]) } else { json!(first) };
            Some(with_count(FieldValue::new().with_data(data), options))
        }
        FieldOptions::GroupBy(o) => {
            let first = match &o.fixed_value {
                Some(fixed) => fixed.as_str(),
                None => first_label(columns.columns(o.data_target), o.exclude_date_field)?,
            };
            let data = if o.multi_selectable { json!([first]) } else { json!(first) };
            Some(with_count(FieldValue::new().with_data(data), options))
        }
        FieldOptions::SankeyDimensions(o) => {
            let available = columns.columns(o.data_target);
            if available.len() < 2 {
                return None;
            }
            let data = json!([available[0], available[1]]);
            Some(with_count(FieldValue::new().with_data(data), options))
        }
        FieldOptions::FormatRules(o) if o.use_field => {
            let mut value = default_value(field_type, options)?;
            if let Some(first) = columns.columns(o.data_target).first() {
                value = value.with_attribute("field", first.as_str());
            }
            Some(value)
        }
        _ => default_value(field_type, options),
    }
}

fn first_label(available: &[String], exclude_date: bool) -> Option<&str> {
    available
        .iter()
        .map(String::as_str)
        .find(|column| !(exclude_date && *column == DATE_FIELD))
}

fn with_count(value: FieldValue, options: &FieldOptions) -> FieldValue {
    match options.constraints() {
        Some(c) if c.uses_count && !c.hide_count => match c.default_max_count {
            Some(count) => value.with_attribute("count", Value::from(count)),
            None => value,
        },
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{AxisOptions, DataFieldOptions, GroupByOptions};
    use test_case::test_case;

    #[test_case(FieldType::Granularity, "granularity", json!("MONTHLY") ; "granularity")]
    #[test_case(FieldType::Legend, "position", json!("right") ; "legend position")]
    #[test_case(FieldType::ColorSchema, "colorName", json!("Coral") ; "color schema")]
    #[test_case(FieldType::PieChartType, "type", json!("pie") ; "pie chart")]
    #[test_case(FieldType::MissingValue, "type", json!("lineToZero") ; "missing value")]
    #[test_case(FieldType::Comparison, "format", json!("all") ; "comparison")]
    #[test_case(FieldType::DateRange, "inherit", json!(true) ; "date range")]
    fn test_static_defaults(field_type: FieldType, key: &str, expected: Value) {
        let options = FieldOptions::defaults_for(&field_type);
        let value = default_value(&field_type, &options).unwrap();
        assert_eq!(value.attribute(key), Some(&expected));
    }

    #[test]
    fn test_legend_defaults_on() {
        let options = FieldOptions::defaults_for(&FieldType::Legend);
        let value = default_value(&FieldType::Legend, &options).unwrap();
        assert_eq!(value.attribute("toggleValue"), Some(&json!(true)));
    }

    #[test]
    fn test_mapping_fields_have_no_static_default() {
        for ft in [FieldType::DataField, FieldType::XAxis, FieldType::TableDataField] {
            let options = FieldOptions::defaults_for(&ft);
            assert!(default_value(&ft, &options).is_none());
        }
    }

    #[test]
    fn test_default_attributes_fill_count() {
        let options = FieldOptions::Axis(AxisOptions {
            max: Some(15),
            default_max_count: Some(10),
            ..AxisOptions::default()
        });
        let attrs = default_attributes(&FieldType::XAxis, &options);
        assert_eq!(attrs.count(), Some(&json!(10)));
        assert!(!attrs.has_data());
    }

    #[test]
    fn test_default_attributes_hidden_count() {
        let options = FieldOptions::GroupBy(GroupByOptions {
            default_max_count: Some(5),
            hide_count: true,
            ..GroupByOptions::default()
        });
        assert!(default_attributes(&FieldType::GroupBy, &options).count().is_none());
    }

    #[test]
    fn test_suggest_all_selected_data_field() {
        let options = FieldOptions::Data(DataFieldOptions {
            multi_selectable: true,
            all_selected: true,
            max: Some(2),
            ..DataFieldOptions::default()
        });
        let columns = TableColumns::new(["cost", "usage", "count"], ["region"]);
        let value = suggest_value(&FieldType::DataField, &options, &columns).unwrap();
        assert_eq!(value.columns(), vec!["cost", "usage"]);
    }

    #[test]
    fn test_suggest_axis_skips_date() {
        let options = FieldOptions::Axis(AxisOptions {
            exclude_date_field: true,
            default_max_count: Some(10),
            ..AxisOptions::default()
        });
        let columns = TableColumns::new(["cost"], ["Date", "region"]);
        let value = suggest_value(&FieldType::XAxis, &options, &columns).unwrap();
        assert_eq!(value.columns(), vec!["region"]);
        assert_eq!(value.count(), Some(&json!(10)));
    }

    #[test]
    fn test_suggest_nothing_for_empty_table() {
        let options = FieldOptions::defaults_for(&FieldType::DataField);
        assert!(suggest_value(&FieldType::DataField, &options, &TableColumns::default()).is_none());
    }

    #[test]
    fn test_suggest_table_data_field_is_versioned() {
        let options = FieldOptions::defaults_for(&FieldType::TableDataField);
        let columns = TableColumns::new(["cost", "usage"], ["region"]);
        let value = suggest_value(&FieldType::TableDataField, &options, &columns).unwrap();
        assert_eq!(value.version.as_deref(), Some("v1"));
        assert_eq!(value.columns(), vec!["cost", "usage"]);
    }
}
