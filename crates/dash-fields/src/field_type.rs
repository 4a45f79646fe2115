//! Field type names and data targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldSchemaError;

/// The kind of a widget field.
///
/// Built-in kinds map one-to-one to a camelCase name used in widget configs and
/// persisted options. Applications may register additional kinds through
/// [`FieldType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    /// A data column (or columns) from `data_info`.
    DataField,
    /// Versioned data column selection for tables and XY charts.
    TableDataField,
    /// A single label column.
    LabelField,
    /// X axis category column with a top-N count.
    XAxis,
    /// Y axis category column with a top-N count.
    YAxis,
    /// Category column for pie/treemap style widgets.
    CategoryBy,
    /// Stack column for stacked charts.
    StackBy,
    /// Group-by column(s).
    GroupBy,
    /// Source/target pair of a sankey chart.
    SankeyDimensions,
    /// Conditional formatting rules.
    FormatRules,
    /// Named color palette.
    ColorSchema,
    /// Period-over-period comparison display.
    Comparison,
    /// Legend display.
    Legend,
    /// Icon shown next to a number card.
    Icon,
    /// Upper bound for gauges.
    Max,
    /// Lower bound for gauges.
    Min,
    /// Time granularity of the widget query.
    Granularity,
    /// Date range of the widget query.
    DateRange,
    /// Date label format.
    DateFormat,
    /// Number display format.
    NumberFormat,
    /// Tooltip number format toggle.
    TooltipNumberFormat,
    /// Missing value rendering for line charts.
    MissingValue,
    /// Pie or donut.
    PieChartType,
    /// Widget height preset.
    WidgetHeight,
    /// Widget header title.
    WidgetHeader,
    /// Table column width policy.
    TableColumnWidth,
    /// Per-column table widths.
    CustomTableColumnWidth,
    /// Series label display.
    DisplaySeriesLabel,
    /// Annotation text under the chart.
    DisplayAnnotation,
    /// Table total row.
    Total,
    /// Table sub-total rows.
    SubTotal,
    /// Table text wrapping.
    TextWrap,
    /// Application-registered field type.
    Custom(String),
}

impl FieldType {
    /// All built-in field types, in registry order.
    pub const BUILTIN: [Self; 32] = [
        Self::DataField,
        Self::TableDataField,
        Self::LabelField,
        Self::XAxis,
        Self::YAxis,
        Self::CategoryBy,
        Self::StackBy,
        Self::GroupBy,
        Self::SankeyDimensions,
        Self::FormatRules,
        Self::ColorSchema,
        Self::Comparison,
        Self::Legend,
        Self::Icon,
        Self::Max,
        Self::Min,
        Self::Granularity,
        Self::DateRange,
        Self::DateFormat,
        Self::NumberFormat,
        Self::TooltipNumberFormat,
        Self::MissingValue,
        Self::PieChartType,
        Self::WidgetHeight,
        Self::WidgetHeader,
        Self::TableColumnWidth,
        Self::CustomTableColumnWidth,
        Self::DisplaySeriesLabel,
        Self::DisplayAnnotation,
        Self::Total,
        Self::SubTotal,
        Self::TextWrap,
    ];

    /// The camelCase name of this field type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::DataField => "dataField",
            Self::TableDataField => "tableDataField",
            Self::LabelField => "labelField",
            Self::XAxis => "xAxis",
            Self::YAxis => "yAxis",
            Self::CategoryBy => "categoryBy",
            Self::StackBy => "stackBy",
            Self::GroupBy => "groupBy",
            Self::SankeyDimensions => "sankeyDimensions",
            Self::FormatRules => "formatRules",
            Self::ColorSchema => "colorSchema",
            Self::Comparison => "comparison",
            Self::Legend => "legend",
            Self::Icon => "icon",
            Self::Max => "max",
            Self::Min => "min",
            Self::Granularity => "granularity",
            Self::DateRange => "dateRange",
            Self::DateFormat => "dateFormat",
            Self::NumberFormat => "numberFormat",
            Self::TooltipNumberFormat => "tooltipNumberFormat",
            Self::MissingValue => "missingValue",
            Self::PieChartType => "pieChartType",
            Self::WidgetHeight => "widgetHeight",
            Self::WidgetHeader => "widgetHeader",
            Self::TableColumnWidth => "tableColumnWidth",
            Self::CustomTableColumnWidth => "customTableColumnWidth",
            Self::DisplaySeriesLabel => "displaySeriesLabel",
            Self::DisplayAnnotation => "displayAnnotation",
            Self::Total => "total",
            Self::SubTotal => "subTotal",
            Self::TextWrap => "textWrap",
            Self::Custom(name) => name,
        }
    }

    /// Look up a built-in field type by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        Self::BUILTIN.into_iter().find(|t| t.name() == name)
    }

    /// Check if this is a data-mapping field (one that picks table columns).
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(
            self,
            Self::DataField
                | Self::TableDataField
                | Self::LabelField
                | Self::XAxis
                | Self::YAxis
                | Self::CategoryBy
                | Self::StackBy
                | Self::GroupBy
                | Self::SankeyDimensions
        )
    }

    /// Check if this is an application-registered type.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = FieldSchemaError;

    /// Parses built-in names only; custom types come from the registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::builtin(s).ok_or_else(|| FieldSchemaError::UnknownFieldType(s.to_string()))
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::builtin(&name).unwrap_or(Self::Custom(name)))
    }
}

/// Which column family of a data table a mapping field reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTarget {
    /// Numeric data columns.
    #[default]
    DataInfo,
    /// Label (dimension) columns.
    LabelsInfo,
}

impl fmt::Display for DataTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataInfo => f.write_str("data_info"),
            Self::LabelsInfo => f.write_str("labels_info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("dataField", FieldType::DataField ; "data field")]
    #[test_case("tableDataField", FieldType::TableDataField ; "table data field")]
    #[test_case("xAxis", FieldType::XAxis ; "x axis")]
    #[test_case("widgetHeader", FieldType::WidgetHeader ; "header")]
    fn test_parse_builtin(name: &str, expected: FieldType) {
        assert_eq!(name.parse::<FieldType>().unwrap(), expected);
        assert_eq!(expected.name(), name);
    }

    #[test]
    fn test_parse_unknown_fails() {
        let err = "sparkline".parse::<FieldType>().unwrap_err();
        assert!(matches!(err, FieldSchemaError::UnknownFieldType(name) if name == "sparkline"));
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<&str> = FieldType::BUILTIN.iter().map(FieldType::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FieldType::BUILTIN.len());
    }

    #[test]
    fn test_deserialize_falls_back_to_custom() {
        let t: FieldType = serde_json::from_str("\"sparkline\"").unwrap();
        assert_eq!(t, FieldType::Custom("sparkline".into()));

        let t: FieldType = serde_json::from_str("\"groupBy\"").unwrap();
        assert_eq!(t, FieldType::GroupBy);
    }

    #[test]
    fn test_mapping_fields() {
        assert!(FieldType::XAxis.is_mapping());
        assert!(FieldType::TableDataField.is_mapping());
        assert!(!FieldType::Legend.is_mapping());
        assert!(!FieldType::Custom("x".into()).is_mapping());
    }

    #[test]
    fn test_data_target_serde() {
        let json = serde_json::to_string(&DataTarget::LabelsInfo).unwrap();
        assert_eq!(json, "\"labels_info\"");
    }
}
