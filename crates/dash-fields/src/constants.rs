//! Fixed vocabularies shared by defaults and validators.

/// Label column name that holds the time axis.
pub const DATE_FIELD: &str = "Date";

/// Versions a `tableDataField` value may carry.
pub const TABLE_DATA_FIELD_VERSIONS: &[&str] = &["v1"];

/// Current `tableDataField` version written by migrations.
pub const TABLE_DATA_FIELD_CURRENT_VERSION: &str = "v1";

/// Default minimum table column width in pixels.
pub const TABLE_DEFAULT_MINIMUM_WIDTH: u32 = 80;

/// Default number of top-N items for group-by style fields.
pub const DEFAULT_GROUP_BY_COUNT: usize = 5;

/// Supported time granularities.
pub const GRANULARITIES: &[&str] = &["DAILY", "MONTHLY", "YEARLY"];

/// Default granularity.
pub const DEFAULT_GRANULARITY: &str = "MONTHLY";

/// Date range types allowed with `DAILY` granularity.
pub const DAILY_DATE_RANGES: &[&str] = &[
    "auto",
    "last7Days",
    "last14Days",
    "thisMonth",
    "lastMonth",
    "custom",
];

/// Date range types allowed with `MONTHLY` granularity.
pub const MONTHLY_DATE_RANGES: &[&str] = &[
    "auto",
    "last3Months",
    "last6Months",
    "last12Months",
    "thisYear",
    "lastYear",
    "custom",
];

/// Date range types allowed with `YEARLY` granularity.
pub const YEARLY_DATE_RANGES: &[&str] = &["auto", "last3Years", "last5Years", "custom"];

/// Date range types allowed for a granularity, if the granularity is known.
#[must_use]
pub fn date_ranges_for(granularity: &str) -> Option<&'static [&'static str]> {
    match granularity {
        "DAILY" => Some(DAILY_DATE_RANGES),
        "MONTHLY" => Some(MONTHLY_DATE_RANGES),
        "YEARLY" => Some(YEARLY_DATE_RANGES),
        _ => None,
    }
}

/// Named color palettes.
pub const COLOR_SCHEMAS: &[(&str, &[&str])] = &[
    (
        "Coral",
        &[
            "#FF7750", "#FFA17A", "#FFC8B0", "#FFE3D7", "#C9472B", "#8F2D1A", "#5C1A0E", "#33100A",
        ],
    ),
    (
        "Classic",
        &[
            "#3366CC", "#DC3912", "#FF9900", "#109618", "#990099", "#0099C6", "#DD4477", "#66AA00",
        ],
    ),
    (
        "Blue",
        &[
            "#0D47A1", "#1565C0", "#1E88E5", "#42A5F5", "#64B5F6", "#90CAF9", "#BBDEFB", "#E3F2FD",
        ],
    ),
    (
        "Violet",
        &[
            "#4A148C", "#6A1B9A", "#8E24AA", "#AB47BC", "#BA68C8", "#CE93D8", "#E1BEE7", "#F3E5F5",
        ],
    ),
    (
        "Green",
        &[
            "#1B5E20", "#2E7D32", "#43A047", "#66BB6A", "#81C784", "#A5D6A7", "#C8E6C9", "#E8F5E9",
        ],
    ),
];

/// Default color palette name.
pub const DEFAULT_COLOR_SCHEMA: &str = "Coral";

/// Look up a palette by name.
#[must_use]
pub fn color_schema(name: &str) -> Option<&'static [&'static str]> {
    COLOR_SCHEMAS
        .iter()
        .find(|(schema, _)| *schema == name)
        .map(|(_, colors)| *colors)
}

/// Icon names a number card may show.
pub const ICON_NAMES: &[&str] = &[
    "ic_circle-filled",
    "ic_square-filled",
    "ic_triangle-filled",
    "ic_star-filled",
    "ic_dollar",
    "ic_server",
    "ic_cloud",
    "ic_warning-filled",
];

/// Default icon name.
pub const DEFAULT_ICON: &str = "ic_circle-filled";

/// Neutral gray used for base and icon colors.
pub const GRAY_200: &str = "#DDDDDF";

/// Dark gray used for icon colors.
pub const GRAY_900: &str = "#222532";

/// Comparison color for decreases.
pub const COMPARISON_DECREASE_COLOR: &str = "#60B731";

/// Comparison color for increases.
pub const COMPARISON_INCREASE_COLOR: &str = "#FF4D4D";

/// Accepted comparison formats.
pub const COMPARISON_FORMATS: &[&str] = &["all", "percent", "fixed"];

/// Accepted legend positions.
pub const LEGEND_POSITIONS: &[&str] = &["right", "bottom", "left", "top"];

/// Accepted line-chart missing value modes.
pub const MISSING_VALUE_TYPES: &[&str] = &["lineToZero", "lineBreak"];

/// Accepted pie chart types.
pub const PIE_CHART_TYPES: &[&str] = &["pie", "donut"];

/// Accepted widget height presets.
pub const WIDGET_HEIGHTS: &[&str] = &["default", "full"];

/// Accepted table column width policies.
pub const TABLE_WIDTH_TYPES: &[&str] = &["auto", "fixed"];

/// Default date label format.
pub const DEFAULT_DATE_FORMAT: &str = "MMM D, YYYY";

/// Rotation bounds for series labels, in degrees.
pub const SERIES_LABEL_ROTATE: std::ops::RangeInclusive<i64> = -90..=90;
