//! Persisted widget model and its lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use dash_fields::WidgetFieldValueMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RegistryError, RegistryResult};

/// Lifecycle state of a widget on a dashboard.
///
/// ```text
/// CREATING -> INACTIVE | ACTIVE
/// INACTIVE <-> ACTIVE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetState {
    /// Placed on the board, never published.
    #[default]
    Creating,
    /// Published with values that are not save-ready, or whose data table changed.
    Inactive,
    /// Published and renderable.
    Active,
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => write!(f, "CREATING"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// Check if a widget state transition is valid.
#[must_use]
pub const fn is_valid_transition(from: WidgetState, to: WidgetState) -> bool {
    matches!(
        (from, to),
        (WidgetState::Creating, WidgetState::Inactive | WidgetState::Active)
            | (WidgetState::Inactive, WidgetState::Active)
            | (WidgetState::Active, WidgetState::Inactive)
    )
}

/// A widget as stored for a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicWidgetModel {
    /// Widget id.
    pub widget_id: String,
    /// Owning dashboard.
    pub dashboard_id: String,
    /// Widget config name, e.g. `lineChart`.
    pub widget_type: String,
    /// Data table feeding the widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_table_id: Option<String>,
    /// Field values.
    #[serde(default)]
    pub options: WidgetFieldValueMap,
    /// Lifecycle state.
    #[serde(default)]
    pub state: WidgetState,
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

impl PublicWidgetModel {
    /// Create a widget in CREATING state with no values.
    #[must_use]
    pub fn new(
        widget_id: impl Into<String>,
        dashboard_id: impl Into<String>,
        widget_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            widget_id: widget_id.into(),
            dashboard_id: dashboard_id.into(),
            widget_type: widget_type.into(),
            data_table_id: None,
            options: WidgetFieldValueMap::new(),
            state: WidgetState::Creating,
            workspace_id: None,
            domain_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the backing data table.
    #[must_use]
    pub fn with_data_table(mut self, data_table_id: impl Into<String>) -> Self {
        self.data_table_id = Some(data_table_id.into());
        self
    }

    /// Set the owning workspace.
    #[must_use]
    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Move to `new_state`, enforcing the lifecycle.
    ///
    /// Staying in the same published state is a no-op.
    pub fn transition_to(&mut self, new_state: WidgetState) -> RegistryResult<()> {
        if self.state == new_state && new_state != WidgetState::Creating {
            return Ok(());
        }
        if !is_valid_transition(self.state, new_state) {
            return Err(RegistryError::InvalidStateTransition {
                from: self.state,
                to: new_state,
            });
        }

        info!(
            widget_id = %self.widget_id,
            from = %self.state,
            to = %new_state,
            "widget state changed"
        );

        self.state = new_state;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Deactivate an active widget after its data table changed.
    ///
    /// Returns whether the state changed.
    pub fn mark_data_table_updated(&mut self) -> bool {
        if self.state != WidgetState::Active {
            return false;
        }
        self.state = WidgetState::Inactive;
        self.updated_at = Utc::now();
        info!(widget_id = %self.widget_id, "data table changed, widget deactivated");
        true
    }
}
