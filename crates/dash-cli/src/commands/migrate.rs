//! Legacy option migration.

use std::io::Write;

use dash_widgets::migrate_legacy_options;
use serde_json::{Map, Value};

use super::Engine;
use crate::cli::MigrateArgs;
use crate::error::CliError;
use crate::input::load_json;
use crate::output::{MigrationReport, OutputFormat};

/// Migrate command executor.
pub struct MigrateCommand<'a> {
    engine: &'a Engine,
}

impl<'a> MigrateCommand<'a> {
    /// Create a new migrate command.
    #[must_use]
    pub const fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Execute the migrate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the options file cannot be loaded, the widget is
    /// unknown or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &MigrateArgs,
    ) -> Result<(), CliError> {
        let legacy: Map<String, Value> = load_json(&args.options)?;
        let report = self.migrate(&args.widget, &legacy)?;
        format.write(writer, &report)
    }

    /// Convert `legacy` options of `widget`.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is unknown.
    pub fn migrate(&self, widget: &str, legacy: &Map<String, Value>) -> Result<MigrationReport, CliError> {
        let values = migrate_legacy_options(self.engine.registry(), widget, legacy)?;
        Ok(MigrationReport {
            widget: widget.to_string(),
            values,
        })
    }
}
