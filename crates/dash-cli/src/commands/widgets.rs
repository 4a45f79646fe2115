//! Widget config inspection.

use std::io::Write;

use dash_widgets::RegisteredWidget;

use super::Engine;
use crate::cli::WidgetCommands;
use crate::error::CliError;
use crate::output::{FieldSummary, OutputFormat, WidgetDetail, WidgetList, WidgetSummary};

/// Widgets command executor.
pub struct WidgetsCommand<'a> {
    engine: &'a Engine,
}

impl<'a> WidgetsCommand<'a> {
    /// Create a new widgets command.
    #[must_use]
    pub const fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Execute a widgets subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is unknown or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &WidgetCommands,
    ) -> Result<(), CliError> {
        match command {
            WidgetCommands::List => format.write(writer, &self.list()),
            WidgetCommands::Show { name } => format.write(writer, &self.show(name)?),
        }
    }

    /// Summaries of every registered widget.
    #[must_use]
    pub fn list(&self) -> WidgetList {
        WidgetList {
            widgets: self.engine.registry().iter().map(summary).collect(),
        }
    }

    /// Resolved fields of one widget.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is unknown.
    pub fn show(&self, name: &str) -> Result<WidgetDetail, CliError> {
        let widget = self.engine.registry().get_widget_config(name)?;
        let meta = &widget.config().meta;
        Ok(WidgetDetail {
            name: widget.name().to_string(),
            title: meta.title.clone(),
            sizes: meta.sizes.clone(),
            consumes_data: meta.consumes_data,
            fields: widget
                .fields()
                .values()
                .map(|field| FieldSummary {
                    key: field.key.clone(),
                    field_type: field.field_type.to_string(),
                    required: field.required,
                    options: field.options.clone(),
                })
                .collect(),
        })
    }
}

fn summary(widget: &RegisteredWidget) -> WidgetSummary {
    let meta = &widget.config().meta;
    WidgetSummary {
        name: widget.name().to_string(),
        title: meta.title.clone(),
        sizes: meta.sizes.clone(),
        required: widget.required_fields().count(),
        optional: widget.optional_fields().count(),
    }
}
