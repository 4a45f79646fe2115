//! Built-in widget configs.

use dash_fields::FieldType;
use serde_json::{Value, json};

use crate::config::{WidgetConfig, WidgetMeta, WidgetSize};

/// Charts plotting a series over a time or category axis.
pub const XY_CHARTS: [&str; 7] = [
    "clusteredColumnChart",
    "lineChart",
    "stackedAreaChart",
    "stackedColumnChart",
    "stackedHorizontalBarChart",
    "heatmap",
    "colorCodedTableHeatmap",
];

fn half_or_full(title: &str) -> WidgetMeta {
    WidgetMeta::new(title).with_sizes([WidgetSize::Md, WidgetSize::Full])
}

fn with_header(config: WidgetConfig) -> WidgetConfig {
    config.optional("widgetHeader", FieldType::WidgetHeader, Value::Null)
}

/// Shared shape of time-series charts: granularity, a category axis and
/// the plotted table data.
fn series_chart(name: &str, title: &str, axis_key: &str, axis: FieldType) -> WidgetConfig {
    with_header(WidgetConfig::new(name, half_or_full(title)))
        .required("granularity", FieldType::Granularity, Value::Null)
        .required(axis_key, axis, json!({"max": 30, "defaultMaxCount": 10}))
        .required("tableDataField", FieldType::TableDataField, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("legend", FieldType::Legend, Value::Null)
        .optional("displaySeriesLabel", FieldType::DisplaySeriesLabel, Value::Null)
        .optional("displayAnnotation", FieldType::DisplayAnnotation, Value::Null)
        .optional("dateFormat", FieldType::DateFormat, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
        .optional("tooltipNumberFormat", FieldType::TooltipNumberFormat, Value::Null)
        .optional("widgetHeight", FieldType::WidgetHeight, Value::Null)
        .optional("colorSchema", FieldType::ColorSchema, Value::Null)
}

fn table() -> WidgetConfig {
    with_header(WidgetConfig::new("table", WidgetMeta::new("Table")))
        .required("tableDataField", FieldType::TableDataField, Value::Null)
        .required(
            "groupBy",
            FieldType::GroupBy,
            json!({"multiSelectable": true, "hideCount": true}),
        )
        .optional("granularity", FieldType::Granularity, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("total", FieldType::Total, json!({"default": true}))
        .optional("subTotal", FieldType::SubTotal, Value::Null)
        .optional("dateFormat", FieldType::DateFormat, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
        .optional("tableColumnWidth", FieldType::TableColumnWidth, Value::Null)
        .optional("customTableColumnWidth", FieldType::CustomTableColumnWidth, Value::Null)
        .optional("textWrap", FieldType::TextWrap, Value::Null)
        .optional(
            "formatRules",
            FieldType::FormatRules,
            json!({"formatRulesType": "textNumberThreshold", "useField": true}),
        )
}

fn line_chart() -> WidgetConfig {
    series_chart("lineChart", "Line Chart", "xAxis", FieldType::XAxis)
        .optional("missingValue", FieldType::MissingValue, Value::Null)
}

fn stacked_area_chart() -> WidgetConfig {
    series_chart("stackedAreaChart", "Stacked Area Chart", "xAxis", FieldType::XAxis)
        .optional("missingValue", FieldType::MissingValue, Value::Null)
}

fn clustered_column_chart() -> WidgetConfig {
    series_chart("clusteredColumnChart", "Clustered Column Chart", "xAxis", FieldType::XAxis)
}

fn stacked_column_chart() -> WidgetConfig {
    series_chart("stackedColumnChart", "Stacked Column Chart", "xAxis", FieldType::XAxis)
        .optional("total", FieldType::Total, Value::Null)
}

fn stacked_horizontal_bar_chart() -> WidgetConfig {
    series_chart(
        "stackedHorizontalBarChart",
        "Stacked Horizontal Bar Chart",
        "yAxis",
        FieldType::YAxis,
    )
    .optional("total", FieldType::Total, Value::Null)
}

fn pie_chart() -> WidgetConfig {
    with_header(WidgetConfig::new("pieChart", half_or_full("Pie Chart")))
        .required("dataField", FieldType::DataField, Value::Null)
        .required(
            "groupBy",
            FieldType::GroupBy,
            json!({"max": 15, "defaultMaxCount": 5}),
        )
        .optional("granularity", FieldType::Granularity, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("pieChartType", FieldType::PieChartType, Value::Null)
        .optional("legend", FieldType::Legend, Value::Null)
        .optional("displaySeriesLabel", FieldType::DisplaySeriesLabel, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
        .optional("colorSchema", FieldType::ColorSchema, Value::Null)
}

fn number_card() -> WidgetConfig {
    with_header(WidgetConfig::new(
        "numberCard",
        WidgetMeta::new("Number Card").with_sizes([WidgetSize::Md]),
    ))
    .required("dataField", FieldType::DataField, Value::Null)
    .optional("granularity", FieldType::Granularity, Value::Null)
    .optional("dateRange", FieldType::DateRange, Value::Null)
    .optional("comparison", FieldType::Comparison, Value::Null)
    .optional("icon", FieldType::Icon, Value::Null)
    .optional("numberFormat", FieldType::NumberFormat, Value::Null)
}

fn gauge() -> WidgetConfig {
    with_header(WidgetConfig::new(
        "gauge",
        WidgetMeta::new("Gauge").with_sizes([WidgetSize::Md]),
    ))
    .required("dataField", FieldType::DataField, Value::Null)
    .optional("granularity", FieldType::Granularity, Value::Null)
    .optional("dateRange", FieldType::DateRange, Value::Null)
    .optional("min", FieldType::Min, Value::Null)
    .optional("max", FieldType::Max, json!({"default": 100.0}))
    .optional(
        "formatRules",
        FieldType::FormatRules,
        json!({"formatRulesType": "numberThreshold"}),
    )
    .optional("numberFormat", FieldType::NumberFormat, Value::Null)
}

fn heatmap() -> WidgetConfig {
    with_header(WidgetConfig::new("heatmap", half_or_full("Heatmap")))
        .required("granularity", FieldType::Granularity, Value::Null)
        .required("xAxis", FieldType::XAxis, json!({"max": 30, "defaultMaxCount": 10}))
        .required("yAxis", FieldType::YAxis, json!({"max": 30, "defaultMaxCount": 10}))
        .required("dataField", FieldType::DataField, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("dateFormat", FieldType::DateFormat, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
        .optional("colorSchema", FieldType::ColorSchema, Value::Null)
}

fn color_coded_table_heatmap() -> WidgetConfig {
    with_header(WidgetConfig::new(
        "colorCodedTableHeatmap",
        WidgetMeta::new("Color Coded Table Heatmap"),
    ))
    .required("granularity", FieldType::Granularity, Value::Null)
    .required(
        "xAxis",
        FieldType::XAxis,
        json!({"max": 30, "defaultMaxCount": 10}),
    )
    .required("tableDataField", FieldType::TableDataField, Value::Null)
    .required(
        "formatRules",
        FieldType::FormatRules,
        json!({"formatRulesType": "percentThreshold"}),
    )
    .optional("dateRange", FieldType::DateRange, Value::Null)
    .optional("dateFormat", FieldType::DateFormat, Value::Null)
    .optional("numberFormat", FieldType::NumberFormat, Value::Null)
}

fn geo_map() -> WidgetConfig {
    with_header(WidgetConfig::new("geoMap", WidgetMeta::new("Geo Map")))
        .required("dataField", FieldType::DataField, Value::Null)
        .required(
            "groupBy",
            FieldType::GroupBy,
            json!({"multiSelectable": true, "fixedValue": "Region", "hideCount": true}),
        )
        .optional("granularity", FieldType::Granularity, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("legend", FieldType::Legend, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
}

fn treemap() -> WidgetConfig {
    with_header(WidgetConfig::new("treemap", half_or_full("Treemap")))
        .required("dataField", FieldType::DataField, Value::Null)
        .required(
            "groupBy",
            FieldType::GroupBy,
            json!({"max": 30, "defaultMaxCount": 10}),
        )
        .optional("granularity", FieldType::Granularity, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("displaySeriesLabel", FieldType::DisplaySeriesLabel, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
        .optional("colorSchema", FieldType::ColorSchema, Value::Null)
}

fn sankey_chart() -> WidgetConfig {
    with_header(WidgetConfig::new("sankeyChart", WidgetMeta::new("Sankey Chart")))
        .required("dataField", FieldType::DataField, Value::Null)
        .required(
            "sankeyDimensions",
            FieldType::SankeyDimensions,
            json!({"max": 10, "defaultMaxCount": 5}),
        )
        .optional("granularity", FieldType::Granularity, Value::Null)
        .optional("dateRange", FieldType::DateRange, Value::Null)
        .optional("numberFormat", FieldType::NumberFormat, Value::Null)
}

/// Every built-in widget config, in board palette order.
#[must_use]
pub fn builtin_widgets() -> Vec<WidgetConfig> {
    vec![
        table(),
        line_chart(),
        stacked_area_chart(),
        clustered_column_chart(),
        stacked_column_chart(),
        stacked_horizontal_bar_chart(),
        pie_chart(),
        number_card(),
        gauge(),
        heatmap(),
        color_coded_table_heatmap(),
        geo_map(),
        treemap(),
        sankey_chart(),
    ]
}
