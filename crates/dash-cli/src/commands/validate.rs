//! Field value validation.

use std::io::Write;

use dash_fields::WidgetFieldValueMap;
use tracing::info;

use super::Engine;
use crate::cli::ValidateArgs;
use crate::error::CliError;
use crate::input::load_json;
use crate::output::{OutputFormat, ValidationReport};

/// Validate command executor.
pub struct ValidateCommand<'a> {
    engine: &'a Engine,
}

impl<'a> ValidateCommand<'a> {
    /// Create a new validate command.
    #[must_use]
    pub const fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Execute the validate command.
    ///
    /// The report is written even when the widget is not save-ready.
    ///
    /// # Errors
    ///
    /// `NotSaveReady` after the report when a required field failed, or
    /// an input, lookup or output error.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &ValidateArgs,
    ) -> Result<(), CliError> {
        let values: WidgetFieldValueMap = load_json(&args.values)?;
        let report = self.validate(&args.widget, &values)?;
        format.write(writer, &report)?;

        if report.save_ready {
            Ok(())
        } else {
            Err(CliError::NotSaveReady {
                widget: report.widget,
                blocking: report.errors.iter().filter(|e| e.required).count(),
            })
        }
    }

    /// Build the value map of `widget` from `values`.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is unknown.
    pub fn validate(&self, widget: &str, values: &WidgetFieldValueMap) -> Result<ValidationReport, CliError> {
        let config = self.engine.registry().get_widget_config(widget)?;
        let build = self.engine.manager().build_field_value_map(config, values);
        info!(
            widget,
            save_ready = build.save_ready,
            errors = build.errors.len(),
            "validated widget values"
        );
        Ok(ValidationReport {
            widget: widget.to_string(),
            save_ready: build.save_ready,
            values: build.map,
            errors: build.errors,
        })
    }
}
