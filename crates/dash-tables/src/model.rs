//! Data table model.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::{FailureReason, TableError, TableResult};
use crate::operator::{Operator, TransformOptions};
use crate::state::{TableState, is_valid_transition};

/// Id prefix of tables created in the editor and not yet persisted.
pub const UNSAVED_PREFIX: &str = "UNSAVED-";

/// Generate an id for an unsaved table.
#[must_use]
pub fn unsaved_id() -> String {
    format!("{UNSAVED_PREFIX}{}", Uuid::new_v4().simple())
}

/// How a table obtains its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Loaded from a backend source.
    Added,
    /// Derived from upstream tables by an operator.
    Transformed,
}

/// Backend source family of an ADDED table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// Cost analysis data source.
    Cost,
    /// Asset inventory metric.
    Asset,
    /// Unified cost across data sources.
    UnifiedCost,
}

/// Backend source of an ADDED table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// A cost data source and one of its data keys.
    Cost {
        /// Data source id.
        data_source_id: String,
        /// Data key, e.g. `cost`.
        data_key: String,
    },
    /// An asset metric.
    Asset {
        /// Metric id.
        metric_id: String,
    },
    /// A unified cost data key.
    UnifiedCost {
        /// Data key.
        data_key: String,
    },
}

impl DataSource {
    /// Source family.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Cost { .. } => SourceType::Cost,
            Self::Asset { .. } => SourceType::Asset,
            Self::UnifiedCost { .. } => SourceType::UnifiedCost,
        }
    }

    fn check(&self) -> Result<(), String> {
        let blank = match self {
            Self::Cost {
                data_source_id,
                data_key,
            } => data_source_id.trim().is_empty() || data_key.trim().is_empty(),
            Self::Asset { metric_id } => metric_id.trim().is_empty(),
            Self::UnifiedCost { data_key } => data_key.trim().is_empty(),
        };
        if blank {
            Err(format!("{:?} source is incomplete", self.source_type()))
        } else {
            Ok(())
        }
    }
}

/// Parameters of an ADDED table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOptions {
    /// Backend source.
    pub source: DataSource,
    /// Label columns the backend groups by.
    #[serde(default)]
    pub group_by: Vec<String>,
    /// Backend filter, label to accepted values.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub filter: IndexMap<String, Vec<String>>,
    /// Display name of the data column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_name: Option<String>,
    /// Unit of the data column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_unit: Option<String>,
}

impl AddOptions {
    /// Options for a source with no grouping.
    #[must_use]
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            group_by: Vec::new(),
            filter: IndexMap::new(),
            data_name: None,
            data_unit: None,
        }
    }

    /// Set the group-by labels.
    #[must_use]
    pub fn with_group_by<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Options of a data table: source parameters or operator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableOptions {
    /// Operator parameters of a TRANSFORMED table.
    Transform(TransformOptions),
    /// Source parameters of an ADDED table.
    Add(AddOptions),
}

impl TableOptions {
    /// Data type implied by the options.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Transform(_) => DataType::Transformed,
            Self::Add(_) => DataType::Added,
        }
    }

    const fn kind(&self) -> (Option<Operator>, Option<SourceType>) {
        match self {
            Self::Transform(options) => (Some(options.operator()), None),
            Self::Add(options) => (None, Some(options.source.source_type())),
        }
    }

    /// Upstream table ids in declared order.
    #[must_use]
    pub fn upstream_ids(&self) -> Vec<&str> {
        match self {
            Self::Transform(options) => options.upstream_ids(),
            Self::Add(_) => Vec::new(),
        }
    }
}

impl From<TransformOptions> for TableOptions {
    fn from(options: TransformOptions) -> Self {
        Self::Transform(options)
    }
}

impl From<AddOptions> for TableOptions {
    fn from(options: AddOptions) -> Self {
        Self::Add(options)
    }
}

/// A data table feeding one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    /// Unique id.
    pub data_table_id: String,
    /// Display name.
    pub name: String,
    /// ADDED or TRANSFORMED.
    pub data_type: DataType,
    /// Source family of an ADDED table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    /// Operator of a TRANSFORMED table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    /// Source or operator parameters.
    pub options: TableOptions,
    /// Lifecycle state.
    #[serde(default)]
    pub state: TableState,
    /// Why the last save failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
    /// Data columns and their metadata.
    #[serde(default)]
    pub data_info: IndexMap<String, Value>,
    /// Label columns and their metadata.
    #[serde(default)]
    pub labels_info: IndexMap<String, Value>,
    /// Owning widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
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

impl DataTable {
    fn with_options(id: impl Into<String>, name: impl Into<String>, options: TableOptions) -> Self {
        let now = Utc::now();
        let (operator, source_type) = options.kind();
        Self {
            data_table_id: id.into(),
            name: name.into(),
            data_type: options.data_type(),
            source_type,
            operator,
            options,
            state: TableState::Draft,
            failure: None,
            data_info: IndexMap::new(),
            labels_info: IndexMap::new(),
            widget_id: None,
            workspace_id: None,
            domain_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an ADDED table in DRAFT.
    #[must_use]
    pub fn added(id: impl Into<String>, name: impl Into<String>, options: AddOptions) -> Self {
        Self::with_options(id, name, TableOptions::Add(options))
    }

    /// Create a TRANSFORMED table in DRAFT.
    #[must_use]
    pub fn transformed(
        id: impl Into<String>,
        name: impl Into<String>,
        options: TransformOptions,
    ) -> Self {
        Self::with_options(id, name, TableOptions::Transform(options))
    }

    /// Set the state without checking the lifecycle.
    #[must_use]
    pub fn with_state(mut self, state: TableState) -> Self {
        self.state = state;
        self
    }

    /// Declare data columns.
    #[must_use]
    pub fn with_data_info<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_info = columns
            .into_iter()
            .map(|c| (c.into(), Value::Object(serde_json::Map::new())))
            .collect();
        self
    }

    /// Declare label columns.
    #[must_use]
    pub fn with_labels_info<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels_info = columns
            .into_iter()
            .map(|c| (c.into(), Value::Object(serde_json::Map::new())))
            .collect();
        self
    }

    /// Attach to a widget.
    #[must_use]
    pub fn with_widget_id(mut self, widget_id: impl Into<String>) -> Self {
        self.widget_id = Some(widget_id.into());
        self
    }

    /// Check if the table has never been persisted.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        self.data_table_id.starts_with(UNSAVED_PREFIX)
    }

    /// Upstream table ids in declared order.
    #[must_use]
    pub fn upstream_ids(&self) -> Vec<&str> {
        self.options.upstream_ids()
    }

    /// Data column names.
    pub fn data_columns(&self) -> impl Iterator<Item = &str> {
        self.data_info.keys().map(String::as_str)
    }

    /// Label column names.
    pub fn label_columns(&self) -> impl Iterator<Item = &str> {
        self.labels_info.keys().map(String::as_str)
    }

    /// Replace the options, keeping data type, operator and source type in step.
    pub fn set_options(&mut self, options: TableOptions) {
        self.data_type = options.data_type();
        (self.operator, self.source_type) = options.kind();
        self.options = options;
        self.updated_at = Utc::now();
    }

    /// Check parameters independent of other tables.
    pub fn check_params(&self) -> Result<(), FailureReason> {
        let invalid = |detail: String| FailureReason::invalid_params(&self.data_table_id, detail);

        if self.data_type != self.options.data_type() {
            return Err(invalid(format!(
                "{:?} table carries {:?} options",
                self.data_type,
                self.options.data_type()
            )));
        }
        match &self.options {
            TableOptions::Add(add) => {
                if self.source_type.is_some_and(|s| s != add.source.source_type()) {
                    return Err(invalid("source type does not match source".into()));
                }
                add.source.check().map_err(invalid)
            }
            TableOptions::Transform(transform) => {
                if self.operator.is_some_and(|op| op != transform.operator()) {
                    return Err(invalid(format!(
                        "operator does not match {} parameters",
                        transform.operator()
                    )));
                }
                transform.validate_params().map_err(invalid)
            }
        }
    }

    /// Move to `new_state`, enforcing the lifecycle.
    pub fn transition_to(&mut self, new_state: TableState) -> TableResult<()> {
        if !is_valid_transition(self.state, new_state) {
            return Err(TableError::invalid_transition(self.state, new_state));
        }

        info!(
            data_table_id = %self.data_table_id,
            from = %self.state,
            to = %new_state,
            "data table state changed"
        );

        self.state = new_state;
        self.updated_at = Utc::now();
        if new_state != TableState::Failed {
            self.failure = None;
        }
        Ok(())
    }

    /// Move from VALIDATING to FAILED, recording why.
    pub fn fail(&mut self, reason: FailureReason) -> TableResult<()> {
        self.transition_to(TableState::Failed)?;
        self.failure = Some(reason);
        Ok(())
    }
}
