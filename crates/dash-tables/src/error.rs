//! Error types for the data table transform model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::TableState;

/// Result type alias for data table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Why a data table cannot be resolved or activated.
///
/// Stored on FAILED tables and surfaced to the author as a blocking save
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind")]
pub enum FailureReason {
    /// An upstream reference names a table that does not exist.
    #[error("data table {table_id} references missing upstream {upstream_id}")]
    MissingUpstream {
        /// Table holding the reference.
        table_id: String,
        /// The missing upstream id.
        upstream_id: String,
    },

    /// An upstream exists but is not ACTIVE.
    #[error("upstream {upstream_id} of data table {table_id} is {state}")]
    InactiveUpstream {
        /// Table holding the reference.
        table_id: String,
        /// The inactive upstream id.
        upstream_id: String,
        /// State of the upstream.
        state: TableState,
    },

    /// Operator parameters are missing or malformed.
    #[error("invalid operator parameters on data table {table_id}: {detail}")]
    InvalidOperatorParams {
        /// Table with the bad parameters.
        table_id: String,
        /// What is wrong.
        detail: String,
    },

    /// Following upstream references leads back to the table.
    #[error("data table {table_id} would form a cycle through upstream {upstream_id}")]
    CycleDetected {
        /// Table whose upstream reference closes the cycle.
        table_id: String,
        /// The upstream that closes the cycle.
        upstream_id: String,
    },
}

impl FailureReason {
    /// Create a missing upstream reason.
    #[must_use]
    pub fn missing_upstream(table_id: impl Into<String>, upstream_id: impl Into<String>) -> Self {
        Self::MissingUpstream {
            table_id: table_id.into(),
            upstream_id: upstream_id.into(),
        }
    }

    /// Create an invalid operator parameters reason.
    #[must_use]
    pub fn invalid_params(table_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidOperatorParams {
            table_id: table_id.into(),
            detail: detail.into(),
        }
    }

    /// Create a cycle reason.
    #[must_use]
    pub fn cycle(table_id: impl Into<String>, upstream_id: impl Into<String>) -> Self {
        Self::CycleDetected {
            table_id: table_id.into(),
            upstream_id: upstream_id.into(),
        }
    }

    /// Check if this is a cycle.
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }
}

/// Errors returned by data table operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// No table with this id.
    #[error("unknown data table: {0}")]
    UnknownTable(String),

    /// A table with this id already exists.
    #[error("data table already exists: {0}")]
    DuplicateTable(String),

    /// The lifecycle does not allow this transition.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: TableState,
        /// Attempted target state.
        to: TableState,
    },

    /// The table or edit was rejected.
    #[error(transparent)]
    Rejected(#[from] FailureReason),
}

impl TableError {
    /// Creates an unknown table error.
    #[must_use]
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownTable(id.into())
    }

    /// Creates an invalid state transition error.
    #[must_use]
    pub const fn invalid_transition(from: TableState, to: TableState) -> Self {
        Self::InvalidStateTransition { from, to }
    }

    /// The rejection reason, if this is a rejection.
    #[must_use]
    pub const fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
