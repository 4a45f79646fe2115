//! Field value validators.
//!
//! Every validator answers one question: is this value acceptable for this
//! field given its resolved options? Validators never mutate the value.
//! The structural checks shared by all fields (shape, emptiness, `max`
//! cardinality) run centrally in [`ValidatorRegistry::validate`] before the
//! type-specific rules.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::constants::{
    self, COMPARISON_FORMATS, DATE_FIELD, GRANULARITIES, ICON_NAMES, LEGEND_POSITIONS,
    MISSING_VALUE_TYPES, PIE_CHART_TYPES, SERIES_LABEL_ROTATE, TABLE_DATA_FIELD_VERSIONS,
    TABLE_WIDTH_TYPES, WIDGET_HEIGHTS,
};
use crate::error::FieldErrorReason;
use crate::field_type::FieldType;
use crate::options::{FieldOptions, FormatRulesType};
use crate::schema::{FieldSchemaMap, ResolvedFieldSchema};
use crate::value::{FieldValue, WidgetFieldValueMap};

/// Regex for `#rgb`, `#rrggbb` and `#rrggbbaa` colors.
static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .unwrap_or_else(|_| unreachable!())
});

/// Validation outcome of a single field.
pub type ValidationOutcome = Result<(), FieldErrorReason>;

/// The widget-level view a validator may consult.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Name of the widget being validated.
    pub widget_name: &'a str,
    /// Every field of the widget.
    pub fields: &'a FieldSchemaMap,
    /// Every value of the widget, after defaults were applied.
    pub values: &'a WidgetFieldValueMap,
}

impl<'a> ValidationContext<'a> {
    /// Create a context.
    #[must_use]
    pub const fn new(
        widget_name: &'a str,
        fields: &'a FieldSchemaMap,
        values: &'a WidgetFieldValueMap,
    ) -> Self {
        Self {
            widget_name,
            fields,
            values,
        }
    }

    /// The value of the first field of the given type.
    #[must_use]
    pub fn value_of_type(&self, field_type: &FieldType) -> Option<&'a FieldValue> {
        self.fields
            .values()
            .find(|field| &field.field_type == field_type)
            .and_then(|field| self.values.get(&field.key))
    }
}

/// A type-specific field validator.
pub trait FieldValidator: Send + Sync {
    /// Check a value against a resolved field.
    fn validate(
        &self,
        value: &FieldValue,
        schema: &ResolvedFieldSchema,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome;
}

impl<F> FieldValidator for F
where
    F: Fn(&FieldValue, &ResolvedFieldSchema, &ValidationContext<'_>) -> ValidationOutcome
        + Send
        + Sync,
{
    fn validate(
        &self,
        value: &FieldValue,
        schema: &ResolvedFieldSchema,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        self(value, schema, ctx)
    }
}

/// Validators keyed by field type.
pub struct ValidatorRegistry {
    validators: HashMap<FieldType, Box<dyn FieldValidator>>,
}

impl ValidatorRegistry {
    /// Create a registry with one validator per built-in field type.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(FieldType::DataField, accept);
        registry.register(FieldType::TableDataField, validate_table_data_field);
        registry.register(FieldType::LabelField, accept);
        registry.register(FieldType::XAxis, validate_top_n);
        registry.register(FieldType::YAxis, validate_top_n);
        registry.register(FieldType::CategoryBy, validate_top_n);
        registry.register(FieldType::StackBy, validate_top_n);
        registry.register(FieldType::GroupBy, validate_group_by);
        registry.register(FieldType::SankeyDimensions, validate_sankey_dimensions);
        registry.register(FieldType::FormatRules, validate_format_rules);
        registry.register(FieldType::ColorSchema, validate_color_schema);
        registry.register(FieldType::Comparison, validate_comparison);
        registry.register(FieldType::Legend, validate_legend);
        registry.register(FieldType::Icon, validate_icon);
        registry.register(FieldType::Max, validate_max);
        registry.register(FieldType::Min, validate_min);
        registry.register(FieldType::Granularity, validate_granularity);
        registry.register(FieldType::DateRange, validate_date_range);
        registry.register(FieldType::DateFormat, accept);
        registry.register(FieldType::NumberFormat, accept);
        registry.register(FieldType::TooltipNumberFormat, accept);
        registry.register(FieldType::MissingValue, validate_missing_value);
        registry.register(FieldType::PieChartType, validate_pie_chart_type);
        registry.register(FieldType::WidgetHeight, validate_widget_height);
        registry.register(FieldType::WidgetHeader, validate_widget_header);
        registry.register(FieldType::TableColumnWidth, validate_table_column_width);
        registry.register(FieldType::CustomTableColumnWidth, validate_custom_table_column_width);
        registry.register(FieldType::DisplaySeriesLabel, validate_display_series_label);
        registry.register(FieldType::DisplayAnnotation, validate_display_annotation);
        registry.register(FieldType::Total, accept);
        registry.register(FieldType::SubTotal, accept);
        registry.register(FieldType::TextWrap, accept);
        registry
    }

    /// Create a registry without validators.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Register (or replace) the validator of a field type.
    pub fn register<V>(&mut self, field_type: FieldType, validator: V)
    where
        V: FieldValidator + 'static,
    {
        self.validators.insert(field_type, Box::new(validator));
    }

    /// Check if a field type has a validator.
    #[must_use]
    pub fn contains(&self, field_type: &FieldType) -> bool {
        self.validators.contains_key(field_type)
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if no validator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validate one value.
    ///
    /// Runs the structural checks, then the validator of the field type.
    /// Types without a validator only fail when required and empty, with a
    /// warning, so authoring is never blocked by a missing validator.
    pub fn validate(
        &self,
        value: &FieldValue,
        schema: &ResolvedFieldSchema,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let Some(validator) = self.validators.get(&schema.field_type) else {
            warn!(
                widget = ctx.widget_name,
                field_type = %schema.field_type,
                key = %schema.key,
                "no validator registered, using permissive fallback"
            );
            let missing = schema.required && is_missing(value, schema);
            return require(!missing, FieldErrorReason::Required);
        };
        if !check_structure(value, schema)? {
            return Ok(());
        }
        validator.validate(value, schema, ctx)
    }

    /// Predicate form of [`Self::validate`].
    #[must_use]
    pub fn is_valid(
        &self,
        value: &FieldValue,
        schema: &ResolvedFieldSchema,
        ctx: &ValidationContext<'_>,
    ) -> bool {
        self.validate(value, schema, ctx).is_ok()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.validators.keys().map(FieldType::name).collect();
        types.sort_unstable();
        f.debug_struct("ValidatorRegistry").field("field_types", &types).finish()
    }
}

/// Whether `value` carries nothing. Mapping fields need a column selection.
fn is_missing(value: &FieldValue, schema: &ResolvedFieldSchema) -> bool {
    if schema.options.constraints().is_some() {
        !value.has_data()
    } else {
        value.is_empty()
    }
}

/// Shape, emptiness and cardinality checks.
///
/// Returns `Ok(false)` for an empty optional value, which needs no further
/// checks.
fn check_structure(value: &FieldValue, schema: &ResolvedFieldSchema) -> Result<bool, FieldErrorReason> {
    if is_missing(value, schema) {
        return if schema.required {
            Err(FieldErrorReason::Required)
        } else {
            Ok(false)
        };
    }
    let Some(constraints) = schema.options.constraints() else {
        return Ok(true);
    };

    match (&value.data, constraints.multi_selectable) {
        (Value::Array(items), true) => {
            if !items.iter().all(is_column_name) {
                return Err(FieldErrorReason::ShapeMismatch);
            }
            if constraints.selection_limit.is_some_and(|limit| items.len() > limit) {
                return Err(FieldErrorReason::TooManySelected);
            }
        }
        (Value::String(_), false) => {}
        (Value::Array(items), false) if items.len() == 1 && is_column_name(&items[0]) => {}
        _ => return Err(FieldErrorReason::ShapeMismatch),
    }

    if let Some(count) = value.count() {
        if constraints.hide_count {
            return Err(FieldErrorReason::CountOutOfRange);
        }
        if constraints.uses_count {
            let count = count.as_u64().ok_or(FieldErrorReason::CountOutOfRange)?;
            let over = constraints
                .count_limit
                .is_some_and(|limit| count > limit as u64);
            if count == 0 || over {
                return Err(FieldErrorReason::CountOutOfRange);
            }
        }
    }
    Ok(true)
}

fn is_column_name(item: &Value) -> bool {
    item.as_str().is_some_and(|s| !s.trim().is_empty())
}

fn payload<T: DeserializeOwned>(value: &FieldValue) -> Result<T, FieldErrorReason> {
    serde_json::from_value(value.to_json()).map_err(|_| FieldErrorReason::ShapeMismatch)
}

fn is_hex_color(color: &str) -> bool {
    HEX_COLOR_REGEX.is_match(color)
}

fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|t| t.trim().is_empty())
}

fn require(condition: bool, reason: FieldErrorReason) -> ValidationOutcome {
    if condition { Ok(()) } else { Err(reason) }
}

fn accept(_: &FieldValue, _: &ResolvedFieldSchema, _: &ValidationContext<'_>) -> ValidationOutcome {
    Ok(())
}

fn one_of(value: &FieldValue, key: &str, allowed: &[&str]) -> ValidationOutcome {
    match value.attribute(key) {
        None => Ok(()),
        Some(Value::String(choice)) => {
            require(allowed.contains(&choice.as_str()), FieldErrorReason::InvalidValue)
        }
        Some(_) => Err(FieldErrorReason::ShapeMismatch),
    }
}

fn non_negative(value: &FieldValue, key: &str) -> ValidationOutcome {
    let number = value
        .attribute(key)
        .and_then(Value::as_f64)
        .ok_or(FieldErrorReason::InvalidValue)?;
    require(number >= 0.0, FieldErrorReason::InvalidValue)
}

fn validate_max(value: &FieldValue, _: &ResolvedFieldSchema, _: &ValidationContext<'_>) -> ValidationOutcome {
    non_negative(value, "max")
}

fn validate_min(value: &FieldValue, _: &ResolvedFieldSchema, _: &ValidationContext<'_>) -> ValidationOutcome {
    non_negative(value, "min")
}

fn validate_missing_value(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    one_of(value, "type", MISSING_VALUE_TYPES)
}

fn validate_pie_chart_type(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    one_of(value, "type", PIE_CHART_TYPES)
}

fn validate_widget_height(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    one_of(value, "type", WIDGET_HEIGHTS)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TableDataFieldPayload {
    field_type: Option<String>,
    criteria: Option<String>,
    count: Option<u64>,
    value_type: Option<String>,
}

fn validate_table_data_field(
    value: &FieldValue,
    schema: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let supported = value
        .version
        .as_deref()
        .is_some_and(|v| TABLE_DATA_FIELD_VERSIONS.contains(&v));
    require(supported, FieldErrorReason::UnsupportedVersion)?;

    let allow_dynamic = match &schema.options {
        FieldOptions::TableData(o) => o.allow_dynamic,
        _ => true,
    };
    let p: TableDataFieldPayload = payload(value)?;
    match p.field_type.as_deref().unwrap_or("staticField") {
        "staticField" => Ok(()),
        "dynamicField" => {
            require(allow_dynamic, FieldErrorReason::InvalidValue)?;
            require(value.columns().len() == 1, FieldErrorReason::ShapeMismatch)?;
            require(!is_blank(p.criteria.as_deref()), FieldErrorReason::InvalidValue)?;
            require(p.count.is_some_and(|c| c > 0), FieldErrorReason::CountOutOfRange)?;
            let value_type = p.value_type.as_deref().unwrap_or("auto");
            require(
                matches!(value_type, "auto" | "fixed"),
                FieldErrorReason::InvalidValue,
            )
        }
        _ => Err(FieldErrorReason::InvalidValue),
    }
}

fn validate_top_n(
    value: &FieldValue,
    schema: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let FieldOptions::Axis(options) = &schema.options else {
        return Ok(());
    };
    if !options.hide_count {
        require(value.count().is_some(), FieldErrorReason::CountOutOfRange)?;
    }
    if options.exclude_date_field {
        require(!value.selects(DATE_FIELD), FieldErrorReason::InvalidValue)?;
    }
    Ok(())
}

fn validate_group_by(
    value: &FieldValue,
    schema: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let FieldOptions::GroupBy(options) = &schema.options else {
        return Ok(());
    };
    if let Some(fixed) = &options.fixed_value {
        require(value.selects(fixed), FieldErrorReason::InvalidValue)?;
    }
    if !options.hide_count && options.max.is_some() {
        require(value.count().is_some(), FieldErrorReason::CountOutOfRange)?;
    }
    if options.exclude_date_field {
        require(!value.selects(DATE_FIELD), FieldErrorReason::InvalidValue)?;
    }
    Ok(())
}

fn validate_sankey_dimensions(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let columns = value.columns();
    let [source, target] = columns.as_slice() else {
        return Err(FieldErrorReason::ShapeMismatch);
    };
    require(source != target, FieldErrorReason::InvalidValue)?;
    require(value.count().is_some(), FieldErrorReason::CountOutOfRange)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FormatRule {
    text: Option<String>,
    number: Option<f64>,
    color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FormatRulesPayload {
    rules: Vec<FormatRule>,
    field: Value,
    base_color: Option<String>,
}

fn validate_format_rules(
    value: &FieldValue,
    schema: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let FieldOptions::FormatRules(options) = &schema.options else {
        return Ok(());
    };
    let p: FormatRulesPayload = payload(value)?;

    let complete = p.rules.iter().all(|rule| {
        let has_text = !is_blank(rule.text.as_deref());
        let has_number = rule.number.is_some();
        let has_color = !is_blank(rule.color.as_deref());
        match options.format_rules_type {
            FormatRulesType::TextThreshold => has_text && has_color,
            FormatRulesType::NumberThreshold | FormatRulesType::PercentThreshold => {
                has_number && has_color
            }
            FormatRulesType::TextNumberThreshold => has_text && has_number && has_color,
            FormatRulesType::Basic => true,
        }
    });
    require(complete, FieldErrorReason::InvalidValue)?;

    let colors_valid = p
        .rules
        .iter()
        .filter_map(|rule| rule.color.as_deref())
        .chain(p.base_color.as_deref())
        .all(is_hex_color);
    require(colors_valid, FieldErrorReason::InvalidValue)?;

    if options.use_field {
        let has_field = match &p.field {
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty() && items.iter().all(is_column_name),
            _ => false,
        };
        require(has_field, FieldErrorReason::InvalidValue)?;
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ColorSchemaPayload {
    color_name: Option<String>,
    color_value: Vec<String>,
}

fn validate_color_schema(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: ColorSchemaPayload = payload(value)?;
    require(!is_blank(p.color_name.as_deref()), FieldErrorReason::InvalidValue)?;
    require(!p.color_value.is_empty(), FieldErrorReason::InvalidValue)?;
    require(
        p.color_value.iter().all(|c| is_hex_color(c)),
        FieldErrorReason::InvalidValue,
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ComparisonPayload {
    toggle_value: bool,
    decrease_color: Option<String>,
    increase_color: Option<String>,
    format: Option<String>,
}

fn validate_comparison(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: ComparisonPayload = payload(value)?;
    if !p.toggle_value {
        return Ok(());
    }
    let colors = [p.decrease_color.as_deref(), p.increase_color.as_deref()];
    require(
        colors.iter().all(|c| c.is_some_and(is_hex_color)),
        FieldErrorReason::InvalidValue,
    )?;
    require(
        p.format.as_deref().is_some_and(|f| COMPARISON_FORMATS.contains(&f)),
        FieldErrorReason::InvalidValue,
    )
}

fn validate_legend(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    one_of(value, "position", LEGEND_POSITIONS)
}

#[derive(Debug, Default, Deserialize)]
struct IconRef {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IconPayload {
    toggle_value: bool,
    icon: Option<IconRef>,
    color: Option<String>,
}

fn validate_icon(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: IconPayload = payload(value)?;
    if !p.toggle_value {
        return Ok(());
    }
    require(p.color.as_deref().is_some_and(is_hex_color), FieldErrorReason::InvalidValue)?;
    let known = p
        .icon
        .and_then(|icon| icon.name)
        .is_some_and(|name| ICON_NAMES.contains(&name.as_str()));
    require(known, FieldErrorReason::InvalidValue)
}

fn validate_granularity(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    match value.attribute("granularity") {
        Some(Value::String(g)) => require(GRANULARITIES.contains(&g.as_str()), FieldErrorReason::InvalidValue),
        Some(_) => Err(FieldErrorReason::ShapeMismatch),
        None => Err(FieldErrorReason::InvalidValue),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DateRangePayload {
    inherit: bool,
    value: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

fn validate_date_range(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    ctx: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: DateRangePayload = payload(value)?;
    if p.inherit {
        return Ok(());
    }
    let range_type = p.value.as_deref().ok_or(FieldErrorReason::InvalidValue)?;
    let granularity = ctx
        .value_of_type(&FieldType::Granularity)
        .and_then(|g| g.attribute("granularity"))
        .and_then(Value::as_str)
        .ok_or(FieldErrorReason::InvalidValue)?;
    let allowed = constants::date_ranges_for(granularity).ok_or(FieldErrorReason::InvalidValue)?;
    require(allowed.contains(&range_type), FieldErrorReason::InvalidValue)?;

    if range_type == "custom" {
        let start = p.start.as_deref().and_then(|s| parse_period(s, granularity));
        let end = p.end.as_deref().and_then(|e| parse_period(e, granularity));
        match (start, end) {
            (Some(start), Some(end)) if start <= end => {}
            _ => return Err(FieldErrorReason::InvalidValue),
        }
    }
    Ok(())
}

/// Parse a custom range bound written at the given granularity
/// (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`).
fn parse_period(raw: &str, granularity: &str) -> Option<NaiveDate> {
    let padded = match granularity {
        "DAILY" => raw.to_string(),
        "MONTHLY" => format!("{raw}-01"),
        "YEARLY" => format!("{raw}-01-01"),
        _ => return None,
    };
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HeaderPayload {
    toggle_value: bool,
    title: Option<String>,
}

fn validate_widget_header(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: HeaderPayload = payload(value)?;
    if !p.toggle_value {
        return Ok(());
    }
    require(!is_blank(p.title.as_deref()), FieldErrorReason::InvalidValue)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TableColumnWidthPayload {
    minimum_width: Option<f64>,
    width_type: Option<String>,
    fixed_width: Option<f64>,
}

fn validate_table_column_width(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: TableColumnWidthPayload = payload(value)?;
    let minimum = p
        .minimum_width
        .filter(|w| *w > 0.0)
        .ok_or(FieldErrorReason::InvalidValue)?;
    let width_type = p.width_type.as_deref().unwrap_or("auto");
    require(TABLE_WIDTH_TYPES.contains(&width_type), FieldErrorReason::InvalidValue)?;
    if width_type == "fixed" {
        let fixed = p.fixed_width.ok_or(FieldErrorReason::InvalidValue)?;
        require(fixed >= minimum, FieldErrorReason::InvalidValue)?;
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WidthInfo {
    field_key: Option<String>,
    width: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CustomWidthPayload {
    width_infos: Vec<WidthInfo>,
}

fn validate_custom_table_column_width(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: CustomWidthPayload = payload(value)?;
    let mut seen = HashSet::new();
    for info in &p.width_infos {
        let key = info
            .field_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(FieldErrorReason::InvalidValue)?;
        require(info.width.is_some_and(|w| w >= 0.0), FieldErrorReason::InvalidValue)?;
        require(seen.insert(key), FieldErrorReason::InvalidValue)?;
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SeriesLabelPayload {
    toggle_value: bool,
    rotate: Option<i64>,
}

fn validate_display_series_label(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: SeriesLabelPayload = payload(value)?;
    match (p.toggle_value, p.rotate) {
        (true, Some(rotate)) => require(SERIES_LABEL_ROTATE.contains(&rotate), FieldErrorReason::InvalidValue),
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnnotationPayload {
    toggle_value: bool,
    annotation: Option<String>,
}

fn validate_display_annotation(
    value: &FieldValue,
    _: &ResolvedFieldSchema,
    _: &ValidationContext<'_>,
) -> ValidationOutcome {
    let p: AnnotationPayload = payload(value)?;
    if !p.toggle_value {
        return Ok(());
    }
    require(!is_blank(p.annotation.as_deref()), FieldErrorReason::InvalidValue)
}
