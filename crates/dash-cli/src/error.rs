//! CLI error types.

use dash_tables::TableError;
use dash_widgets::RegistryError;
use thiserror::Error;

/// Exit status when a widget is not ready to be saved.
pub const EXIT_NOT_SAVE_READY: u8 = 2;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read or parsed.
    #[error("{0:#}")]
    Input(#[from] anyhow::Error),

    /// Widget registry lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Data table operation failed.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The widget values block saving.
    #[error("widget {widget} is not ready to be saved: {blocking} blocking error(s)")]
    NotSaveReady {
        /// Widget name.
        widget: String,
        /// Number of blocking errors.
        blocking: usize,
    },

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotSaveReady { .. } => EXIT_NOT_SAVE_READY,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_not_save_ready() {
        let err = CliError::NotSaveReady {
            widget: "lineChart".into(),
            blocking: 2,
        };
        assert_eq!(
            err.to_string(),
            "widget lineChart is not ready to be saved: 2 blocking error(s)"
        );
        assert_eq!(err.exit_code(), EXIT_NOT_SAVE_READY);
    }

    #[test]
    fn cli_error_from_registry_error() {
        let err = CliError::from(RegistryError::UnknownWidget("pie".into()));
        assert!(matches!(err, CliError::Registry(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn cli_error_input_keeps_context_chain() {
        let err = CliError::from(anyhow::anyhow!("invalid type").context("parsing values.json"));
        assert_eq!(err.to_string(), "parsing values.json: invalid type");
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
