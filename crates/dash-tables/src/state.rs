//! Data table lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a data table.
///
/// ```text
/// DRAFT -> VALIDATING -> ACTIVE | FAILED
/// ACTIVE | FAILED -> DRAFT       (edited)
/// ACTIVE | FAILED -> VALIDATING  (saved again)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    /// Created or edited, not yet validated.
    #[default]
    Draft,
    /// Save in progress.
    Validating,
    /// Parameters valid and every upstream active.
    Active,
    /// Validation failed; the reason is stored on the table.
    Failed,
}

impl TableState {
    /// Check if the state is the outcome of a save.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Active | Self::Failed)
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Validating => write!(f, "VALIDATING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Check if a state transition is valid.
#[must_use]
pub const fn is_valid_transition(from: TableState, to: TableState) -> bool {
    matches!(
        (from, to),
        (TableState::Draft, TableState::Validating)
            | (TableState::Validating, TableState::Active | TableState::Failed)
            | (TableState::Active | TableState::Failed, TableState::Draft | TableState::Validating)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TableState::Draft, TableState::Validating ; "save")]
    #[test_case(TableState::Validating, TableState::Active ; "activate")]
    #[test_case(TableState::Validating, TableState::Failed ; "fail")]
    #[test_case(TableState::Active, TableState::Draft ; "edit active")]
    #[test_case(TableState::Failed, TableState::Draft ; "edit failed")]
    #[test_case(TableState::Active, TableState::Validating ; "resave active")]
    #[test_case(TableState::Failed, TableState::Validating ; "resave failed")]
    fn test_valid_transitions(from: TableState, to: TableState) {
        assert!(is_valid_transition(from, to));
    }

    #[test_case(TableState::Draft, TableState::Active ; "skip validation")]
    #[test_case(TableState::Draft, TableState::Failed ; "fail draft")]
    #[test_case(TableState::Validating, TableState::Draft ; "edit while validating")]
    #[test_case(TableState::Active, TableState::Failed ; "fail active")]
    #[test_case(TableState::Draft, TableState::Draft ; "self loop")]
    fn test_invalid_transitions(from: TableState, to: TableState) {
        assert!(!is_valid_transition(from, to));
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&TableState::Validating).unwrap();
        assert_eq!(json, "\"VALIDATING\"");
        let state: TableState = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(state, TableState::Failed);
        assert_eq!(state.to_string(), "FAILED");
    }

    #[test]
    fn test_settled() {
        assert!(TableState::Active.is_settled());
        assert!(!TableState::Draft.is_settled());
    }
}
