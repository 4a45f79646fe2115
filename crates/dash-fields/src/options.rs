//! Typed option records for each field type.
//!
//! Every field type owns one option record. Widget configs override
//! individual keys; [`FieldOptions::merge`] applies the overrides and rejects
//! keys the record does not declare.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldResult, FieldSchemaError};
use crate::field_type::{DataTarget, FieldType};

/// Options of `dataField`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFieldOptions {
    /// Column family the field picks from.
    pub data_target: DataTarget,
    /// Whether several columns may be picked.
    pub multi_selectable: bool,
    /// Whether every column is selected initially.
    pub all_selected: bool,
    /// Maximum number of selected columns.
    pub max: Option<usize>,
}

impl Default for DataFieldOptions {
    fn default() -> Self {
        Self {
            data_target: DataTarget::DataInfo,
            multi_selectable: false,
            all_selected: false,
            max: None,
        }
    }
}

/// Options of `tableDataField`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableDataFieldOptions {
    /// Column family static selections pick from.
    pub data_target: DataTarget,
    /// Whether several columns may be picked.
    pub multi_selectable: bool,
    /// Maximum number of selected columns.
    pub max: Option<usize>,
    /// Whether the dynamic (criteria + label column) form is accepted.
    pub allow_dynamic: bool,
}

impl Default for TableDataFieldOptions {
    fn default() -> Self {
        Self {
            data_target: DataTarget::DataInfo,
            multi_selectable: true,
            max: None,
            allow_dynamic: true,
        }
    }
}

/// Options of `labelField`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelFieldOptions {
    /// Column family the field picks from.
    pub data_target: DataTarget,
    /// Whether several columns may be picked.
    pub multi_selectable: bool,
    /// Maximum number of selected columns.
    pub max: Option<usize>,
}

impl Default for LabelFieldOptions {
    fn default() -> Self {
        Self {
            data_target: DataTarget::LabelsInfo,
            multi_selectable: false,
            max: None,
        }
    }
}

/// Options of the top-N category fields: `xAxis`, `yAxis`, `categoryBy`, `stackBy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisOptions {
    /// Column family the field picks from.
    pub data_target: DataTarget,
    /// Whether several columns may be picked.
    pub multi_selectable: bool,
    /// Upper bound of `count`.
    pub max: Option<usize>,
    /// `count` filled in when the value does not carry one.
    pub default_max_count: Option<usize>,
    /// Whether `count` is hidden (and therefore forbidden).
    pub hide_count: bool,
    /// Whether the `Date` column is excluded.
    pub exclude_date_field: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            data_target: DataTarget::LabelsInfo,
            multi_selectable: false,
            max: None,
            default_max_count: None,
            hide_count: false,
            exclude_date_field: false,
        }
    }
}

/// Options of `groupBy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupByOptions {
    /// Column family the field picks from.
    pub data_target: DataTarget,
    /// Whether several columns may be picked.
    pub multi_selectable: bool,
    /// Upper bound of `count`.
    pub max: Option<usize>,
    /// `count` filled in when the value does not carry one.
    pub default_max_count: Option<usize>,
    /// Whether `count` is hidden (and therefore forbidden).
    pub hide_count: bool,
    /// Column the selection must always contain.
    pub fixed_value: Option<String>,
    /// Whether the `Date` column is excluded.
    pub exclude_date_field: bool,
}

impl Default for GroupByOptions {
    fn default() -> Self {
        Self {
            data_target: DataTarget::LabelsInfo,
            multi_selectable: false,
            max: None,
            default_max_count: None,
            hide_count: false,
            fixed_value: None,
            exclude_date_field: false,
        }
    }
}

/// Options of `sankeyDimensions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SankeyDimensionsOptions {
    /// Column family the dimensions pick from.
    pub data_target: DataTarget,
    /// Upper bound of `count`.
    pub max: Option<usize>,
    /// `count` filled in when the value does not carry one.
    pub default_max_count: Option<usize>,
}

impl Default for SankeyDimensionsOptions {
    fn default() -> Self {
        Self {
            data_target: DataTarget::LabelsInfo,
            max: None,
            default_max_count: None,
        }
    }
}

/// How format rules are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatRulesType {
    /// Rules match on text.
    TextThreshold,
    /// Rules match on numbers.
    NumberThreshold,
    /// Rules match on percentages.
    PercentThreshold,
    /// Rules match on a text column and a number.
    TextNumberThreshold,
    /// Plain per-field coloring.
    #[default]
    Basic,
}

/// Options of `formatRules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatRulesOptions {
    /// Rule evaluation mode.
    pub format_rules_type: FormatRulesType,
    /// Whether the value names the column the rules apply to.
    pub use_field: bool,
    /// Column family `field` picks from.
    pub data_target: DataTarget,
    /// Base color override.
    pub base_color: Option<String>,
}

impl Default for FormatRulesOptions {
    fn default() -> Self {
        Self {
            format_rules_type: FormatRulesType::Basic,
            use_field: false,
            data_target: DataTarget::DataInfo,
            base_color: None,
        }
    }
}

/// Options of `colorSchema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorSchemaOptions {
    /// Default palette name.
    pub default: String,
}

impl Default for ColorSchemaOptions {
    fn default() -> Self {
        Self {
            default: crate::constants::DEFAULT_COLOR_SCHEMA.to_string(),
        }
    }
}

/// Options of on/off fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToggleOptions {
    /// Initial `toggleValue`.
    pub default: bool,
}

/// Options of `legend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendOptions {
    /// Initial `toggleValue`.
    pub toggle: bool,
    /// Whether the position picker is shown.
    pub show_position_field: bool,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            toggle: true,
            show_position_field: false,
        }
    }
}

/// Options of `icon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconOptions {
    /// Initial `toggleValue`.
    pub toggle: bool,
    /// Default icon name.
    pub default: String,
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            toggle: true,
            default: crate::constants::DEFAULT_ICON.to_string(),
        }
    }
}

/// Options of `max` and `min`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundOptions {
    /// Initial bound.
    pub default: Option<f64>,
}

/// Options of single-choice fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceOptions {
    /// Initial choice.
    pub default: Option<String>,
}

/// Options of `tableColumnWidth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableColumnWidthOptions {
    /// Initial minimum width.
    pub default_minimum_width: u32,
    /// Initial fixed width.
    pub default_fixed_width: Option<u32>,
}

impl Default for TableColumnWidthOptions {
    fn default() -> Self {
        Self {
            default_minimum_width: crate::constants::TABLE_DEFAULT_MINIMUM_WIDTH,
            default_fixed_width: None,
        }
    }
}

/// Effective options of one field, one variant per option record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldOptions {
    /// `dataField`.
    Data(DataFieldOptions),
    /// `tableDataField`.
    TableData(TableDataFieldOptions),
    /// `labelField`.
    Label(LabelFieldOptions),
    /// `xAxis`, `yAxis`, `categoryBy`, `stackBy`.
    Axis(AxisOptions),
    /// `groupBy`.
    GroupBy(GroupByOptions),
    /// `sankeyDimensions`.
    SankeyDimensions(SankeyDimensionsOptions),
    /// `formatRules`.
    FormatRules(FormatRulesOptions),
    /// `colorSchema`.
    ColorSchema(ColorSchemaOptions),
    /// On/off fields.
    Toggle(ToggleOptions),
    /// `legend`.
    Legend(LegendOptions),
    /// `icon`.
    Icon(IconOptions),
    /// `max`, `min`.
    Bound(BoundOptions),
    /// Single-choice fields.
    Choice(ChoiceOptions),
    /// `tableColumnWidth`.
    TableColumnWidth(TableColumnWidthOptions),
    /// Application-registered field types.
    Custom(Map<String, Value>),
}

/// Column-selection constraints shared by mapping fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingConstraints {
    /// Column family the field picks from.
    pub data_target: DataTarget,
    /// Whether `data` must be an array.
    pub multi_selectable: bool,
    /// Upper bound of the number of selected columns.
    pub selection_limit: Option<usize>,
    /// Upper bound of `count` for top-N fields.
    pub count_limit: Option<usize>,
    /// `count` filled in when the value does not carry one.
    pub default_max_count: Option<usize>,
    /// Whether the field carries a top-N `count` at all.
    pub uses_count: bool,
    /// Whether `count` is forbidden.
    pub hide_count: bool,
}

impl FieldOptions {
    /// Default option record of a built-in field type.
    #[must_use]
    pub fn defaults_for(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::DataField => Self::Data(DataFieldOptions::default()),
            FieldType::TableDataField => Self::TableData(TableDataFieldOptions::default()),
            FieldType::LabelField => Self::Label(LabelFieldOptions::default()),
            FieldType::XAxis | FieldType::YAxis | FieldType::CategoryBy | FieldType::StackBy => {
                Self::Axis(AxisOptions::default())
            }
            FieldType::GroupBy => Self::GroupBy(GroupByOptions::default()),
            FieldType::SankeyDimensions => {
                Self::SankeyDimensions(SankeyDimensionsOptions::default())
            }
            FieldType::FormatRules => Self::FormatRules(FormatRulesOptions::default()),
            FieldType::ColorSchema => Self::ColorSchema(ColorSchemaOptions::default()),
            FieldType::Comparison => Self::Toggle(ToggleOptions { default: true }),
            FieldType::TooltipNumberFormat
            | FieldType::WidgetHeader
            | FieldType::DisplaySeriesLabel
            | FieldType::DisplayAnnotation
            | FieldType::Total
            | FieldType::SubTotal
            | FieldType::TextWrap => Self::Toggle(ToggleOptions::default()),
            FieldType::Legend => Self::Legend(LegendOptions::default()),
            FieldType::Icon => Self::Icon(IconOptions::default()),
            FieldType::Max | FieldType::Min => Self::Bound(BoundOptions::default()),
            FieldType::Granularity => Self::Choice(ChoiceOptions {
                default: Some(crate::constants::DEFAULT_GRANULARITY.to_string()),
            }),
            FieldType::DateRange => Self::Choice(ChoiceOptions {
                default: Some("auto".to_string()),
            }),
            FieldType::DateFormat => Self::Choice(ChoiceOptions {
                default: Some(crate::constants::DEFAULT_DATE_FORMAT.to_string()),
            }),
            FieldType::MissingValue => Self::Choice(ChoiceOptions {
                default: Some("lineToZero".to_string()),
            }),
            FieldType::PieChartType => Self::Choice(ChoiceOptions {
                default: Some("pie".to_string()),
            }),
            FieldType::WidgetHeight => Self::Choice(ChoiceOptions {
                default: Some("default".to_string()),
            }),
            FieldType::NumberFormat => Self::Choice(ChoiceOptions::default()),
            FieldType::TableColumnWidth => {
                Self::TableColumnWidth(TableColumnWidthOptions::default())
            }
            FieldType::CustomTableColumnWidth => Self::Custom(Map::new()),
            FieldType::Custom(_) => Self::Custom(Map::new()),
        }
    }

    /// Apply `overrides` over these options.
    ///
    /// Overrides win. A key the option record does not declare fails with
    /// [`FieldSchemaError::InvalidOptionKey`]; a value of the wrong type fails
    /// with [`FieldSchemaError::InvalidOptionValue`].
    pub fn merge(&self, field_type: &FieldType, overrides: &Map<String, Value>) -> FieldResult<Self> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }
        Ok(match self {
            Self::Data(o) => Self::Data(merge_record(field_type, o, overrides)?),
            Self::TableData(o) => Self::TableData(merge_record(field_type, o, overrides)?),
            Self::Label(o) => Self::Label(merge_record(field_type, o, overrides)?),
            Self::Axis(o) => Self::Axis(merge_record(field_type, o, overrides)?),
            Self::GroupBy(o) => Self::GroupBy(merge_record(field_type, o, overrides)?),
            Self::SankeyDimensions(o) => {
                Self::SankeyDimensions(merge_record(field_type, o, overrides)?)
            }
            Self::FormatRules(o) => Self::FormatRules(merge_record(field_type, o, overrides)?),
            Self::ColorSchema(o) => Self::ColorSchema(merge_record(field_type, o, overrides)?),
            Self::Toggle(o) => Self::Toggle(merge_record(field_type, o, overrides)?),
            Self::Legend(o) => Self::Legend(merge_record(field_type, o, overrides)?),
            Self::Icon(o) => Self::Icon(merge_record(field_type, o, overrides)?),
            Self::Bound(o) => Self::Bound(merge_record(field_type, o, overrides)?),
            Self::Choice(o) => Self::Choice(merge_record(field_type, o, overrides)?),
            Self::TableColumnWidth(o) => {
                Self::TableColumnWidth(merge_record(field_type, o, overrides)?)
            }
            Self::Custom(o) => Self::Custom(merge_record(field_type, o, overrides)?),
        })
    }

    /// Column-selection constraints, for mapping fields.
    #[must_use]
    pub fn constraints(&self) -> Option<MappingConstraints> {
        let constraints = match self {
            Self::Data(o) => MappingConstraints {
                data_target: o.data_target,
                multi_selectable: o.multi_selectable,
                selection_limit: o.max,
                count_limit: None,
                default_max_count: None,
                uses_count: false,
                hide_count: false,
            },
            Self::TableData(o) => MappingConstraints {
                data_target: o.data_target,
                multi_selectable: o.multi_selectable,
                selection_limit: o.max,
                count_limit: None,
                default_max_count: None,
                uses_count: false,
                hide_count: false,
            },
            Self::Label(o) => MappingConstraints {
                data_target: o.data_target,
                multi_selectable: o.multi_selectable,
                selection_limit: o.max,
                count_limit: None,
                default_max_count: None,
                uses_count: false,
                hide_count: false,
            },
            Self::Axis(o) => MappingConstraints {
                data_target: o.data_target,
                multi_selectable: o.multi_selectable,
                selection_limit: None,
                count_limit: o.max,
                default_max_count: o.default_max_count,
                uses_count: true,
                hide_count: o.hide_count,
            },
            Self::GroupBy(o) => MappingConstraints {
                data_target: o.data_target,
                multi_selectable: o.multi_selectable,
                selection_limit: None,
                count_limit: o.max,
                default_max_count: o.default_max_count,
                uses_count: true,
                hide_count: o.hide_count,
            },
            Self::SankeyDimensions(o) => MappingConstraints {
                data_target: o.data_target,
                multi_selectable: true,
                selection_limit: None,
                count_limit: o.max,
                default_max_count: o.default_max_count,
                uses_count: true,
                hide_count: false,
            },
            _ => return None,
        };
        Some(constraints)
    }

    /// The options as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn merge_record<T>(field_type: &FieldType, base: &T, overrides: &Map<String, Value>) -> FieldResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(base) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => return Err(FieldSchemaError::invalid_option_value(field_type, e.to_string())),
    };
    for (key, value) in overrides {
        if !merged.contains_key(key) {
            return Err(FieldSchemaError::invalid_option_key(field_type, key));
        }
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| FieldSchemaError::invalid_option_value(field_type, e.to_string()))
}
