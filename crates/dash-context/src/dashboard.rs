//! Dashboard DTO as returned by the dashboard API.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Refresh interval used when a dashboard declares none.
pub const DEFAULT_REFRESH_INTERVAL: &str = "off";

/// Accepted refresh interval options.
pub const REFRESH_INTERVAL_OPTIONS: &[&str] = &["off", "15s", "30s", "1m", "5m", "10m", "15m"];

/// Dashboard-wide date range, as `YYYY-MM` or `YYYY-MM-DD` bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First period shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Last period shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Options shared by every widget of a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    /// Date range inherited by widgets whose `dateRange` inherits.
    pub date_range: DateRange,
    /// Auto refresh interval.
    pub refresh_interval_option: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            date_range: DateRange::default(),
            refresh_interval_option: DEFAULT_REFRESH_INTERVAL.to_string(),
        }
    }
}

impl DashboardOptions {
    /// Check if the refresh interval is one of [`REFRESH_INTERVAL_OPTIONS`].
    #[must_use]
    pub fn has_known_refresh_interval(&self) -> bool {
        REFRESH_INTERVAL_OPTIONS.contains(&self.refresh_interval_option.as_str())
    }
}

/// Selected values of dashboard variables, e.g. `project -> [p-1, p-2]`.
pub type DashboardVars = IndexMap<String, Vec<String>>;

/// One board layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    /// Layout name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Widget ids, in board order.
    #[serde(default)]
    pub widgets: Vec<String>,
    /// Renderer-specific layout options.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

/// A dashboard and the state its widgets read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Dashboard id.
    pub dashboard_id: String,
    /// Display name.
    pub name: String,
    /// Shared options.
    #[serde(default)]
    pub options: DashboardOptions,
    /// Variable selections.
    #[serde(default)]
    pub vars: DashboardVars,
    /// Board layouts.
    #[serde(default)]
    pub layouts: Vec<DashboardLayout>,
    /// Owning workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Owning domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Dashboard {
    /// Create a dashboard with default options and no widgets.
    #[must_use]
    pub fn new(dashboard_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            dashboard_id: dashboard_id.into(),
            name: name.into(),
            options: DashboardOptions::default(),
            vars: DashboardVars::new(),
            layouts: Vec::new(),
            workspace_id: None,
            domain_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the shared options.
    #[must_use]
    pub fn with_options(mut self, options: DashboardOptions) -> Self {
        self.options = options;
        self
    }

    /// Select values of one variable.
    #[must_use]
    pub fn with_var<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vars
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Append a layout.
    #[must_use]
    pub fn with_layout(mut self, layout: DashboardLayout) -> Self {
        self.layouts.push(layout);
        self
    }

    /// Widget ids across all layouts, in board order.
    pub fn widget_ids(&self) -> impl Iterator<Item = &str> {
        self.layouts
            .iter()
            .flat_map(|layout| layout.widgets.iter().map(String::as_str))
    }
}
