//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use dash_fields::{FieldError, FieldOptions, WidgetFieldValueMap};
use dash_tables::{FailureReason, ResolvedTable, TableState};
use dash_widgets::WidgetSize;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

fn compact<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string(value).map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))
}

fn sizes_label(sizes: &[WidgetSize]) -> String {
    sizes
        .iter()
        .map(|s| match s {
            WidgetSize::Md => "md",
            WidgetSize::Full => "full",
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// One row of the widget list.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSummary {
    /// Widget name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Allowed sizes.
    pub sizes: Vec<WidgetSize>,
    /// Number of required fields.
    pub required: usize,
    /// Number of optional fields.
    pub optional: usize,
}

/// Registered widgets.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetList {
    /// Widgets in registration order.
    pub widgets: Vec<WidgetSummary>,
}

impl TableDisplay for WidgetList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.widgets.is_empty() {
            writeln!(writer, "No widgets registered")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<28}  {:<32}  {:<8}  {:>8}  {:>8}",
            "NAME", "TITLE", "SIZES", "REQUIRED", "OPTIONAL"
        )?;
        writeln!(writer, "{}", "─".repeat(92))?;
        for widget in &self.widgets {
            writeln!(
                writer,
                "{:<28}  {:<32}  {:<8}  {:>8}  {:>8}",
                widget.name,
                truncate(&widget.title, 32),
                sizes_label(&widget.sizes),
                widget.required,
                widget.optional
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} widget(s)", self.widgets.len())?;
        Ok(())
    }
}

/// One resolved field of a widget.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    /// Field key.
    pub key: String,
    /// Field type name.
    pub field_type: String,
    /// Whether the field is required.
    pub required: bool,
    /// Effective options.
    pub options: FieldOptions,
}

/// Detailed widget information.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetDetail {
    /// Widget name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Allowed sizes.
    pub sizes: Vec<WidgetSize>,
    /// Whether the widget renders a data table.
    pub consumes_data: bool,
    /// Fields in schema order.
    pub fields: Vec<FieldSummary>,
}

impl TableDisplay for WidgetDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Widget: {}", self.name)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Title:          {}", self.title)?;
        writeln!(writer, "Sizes:          {}", sizes_label(&self.sizes))?;
        writeln!(writer, "Consumes data:  {}", if self.consumes_data { "yes" } else { "no" })?;
        writeln!(writer)?;
        writeln!(writer, "{:<24}  {:<24}  {:<8}  OPTIONS", "KEY", "TYPE", "REQUIRED")?;
        writeln!(writer, "{}", "─".repeat(80))?;
        for field in &self.fields {
            writeln!(
                writer,
                "{:<24}  {:<24}  {:<8}  {}",
                field.key,
                field.field_type,
                if field.required { "yes" } else { "no" },
                compact(&field.options)?
            )?;
        }
        Ok(())
    }
}

/// Result of building a widget's field values.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Widget name.
    pub widget: String,
    /// Whether no failure concerns a required key.
    pub save_ready: bool,
    /// Completed values.
    pub values: WidgetFieldValueMap,
    /// Every failure found.
    pub errors: Vec<FieldError>,
}

impl TableDisplay for ValidationReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Widget:      {}", self.widget)?;
        writeln!(writer, "Save ready:  {}", if self.save_ready { "yes" } else { "no" })?;
        writeln!(writer)?;
        write_values(writer, &self.values)?;

        if self.errors.is_empty() {
            return Ok(());
        }
        writeln!(writer)?;
        writeln!(writer, "{:<24}  {:<24}  {:<8}  REASON", "KEY", "TYPE", "REQUIRED")?;
        writeln!(writer, "{}", "─".repeat(80))?;
        for error in &self.errors {
            writeln!(
                writer,
                "{:<24}  {:<24}  {:<8}  {}",
                error.key,
                error.field_type.to_string(),
                if error.required { "yes" } else { "no" },
                error.reason
            )?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} error(s)", self.errors.len())?;
        Ok(())
    }
}

/// Legacy options converted to field values.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// Widget name.
    pub widget: String,
    /// Converted values in schema order.
    pub values: WidgetFieldValueMap,
}

impl TableDisplay for MigrationReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Widget:  {}", self.widget)?;
        writeln!(writer)?;
        write_values(writer, &self.values)
    }
}

fn write_values<W: Write>(writer: &mut W, values: &WidgetFieldValueMap) -> Result<(), CliError> {
    if values.is_empty() {
        writeln!(writer, "No field values")?;
        return Ok(());
    }
    writeln!(writer, "{:<24}  VALUE", "KEY")?;
    writeln!(writer, "{}", "─".repeat(80))?;
    for (key, value) in values {
        writeln!(writer, "{:<24}  {}", key, compact(value)?)?;
    }
    Ok(())
}

impl TableDisplay for ResolvedTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Data table:  {}", self.data_table_id)?;
        writeln!(writer)?;
        for (step, operation) in self.operations.iter().enumerate() {
            writeln!(writer, "{:>3}. {operation}", step + 1)?;
        }
        writeln!(writer)?;
        writeln!(writer, "Roots: {}", self.roots().join(", "))?;
        Ok(())
    }
}

/// Execution order of a set of tables.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOrder {
    /// Table ids, every upstream before its dependents.
    pub order: Vec<String>,
}

impl TableDisplay for ExecutionOrder {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.order.is_empty() {
            writeln!(writer, "No data tables")?;
            return Ok(());
        }
        for (step, id) in self.order.iter().enumerate() {
            writeln!(writer, "{:>3}. {id}", step + 1)?;
        }
        Ok(())
    }
}

/// State of one table after a save.
#[derive(Debug, Clone, Serialize)]
pub struct TableCheck {
    /// Table id.
    pub data_table_id: String,
    /// State after the save.
    pub state: TableState,
    /// Why the save failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

/// States of every table after saving them in order.
#[derive(Debug, Clone, Serialize)]
pub struct TableCheckReport {
    /// Tables in execution order.
    pub tables: Vec<TableCheck>,
}

impl TableCheckReport {
    /// Number of tables that ended FAILED.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.tables.iter().filter(|t| t.state == TableState::Failed).count()
    }
}

impl TableDisplay for TableCheckReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.tables.is_empty() {
            writeln!(writer, "No data tables")?;
            return Ok(());
        }

        writeln!(writer, "{:<36}  {:<10}  REASON", "ID", "STATE")?;
        writeln!(writer, "{}", "─".repeat(80))?;
        for table in &self.tables {
            let reason = table.failure.as_ref().map(ToString::to_string).unwrap_or_default();
            writeln!(
                writer,
                "{:<36}  {:<10}  {}",
                table.data_table_id,
                table.state.to_string(),
                reason
            )?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "Total: {} table(s), {} failed",
            self.tables.len(),
            self.failed()
        )?;
        Ok(())
    }
}

/// Truncate a string to max length, adding ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_fields::{FieldErrorReason, FieldType, FieldValue};

    #[test]
    fn output_format_json() {
        let format = OutputFormat::new(Format::Json);
        let report = ExecutionOrder {
            order: vec!["T1".into(), "T2".into()],
        };
        let out = format.to_string(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["order"][1], "T2");
    }

    #[test]
    fn widget_list_table() {
        let list = WidgetList {
            widgets: vec![WidgetSummary {
                name: "lineChart".into(),
                title: "Line Chart".into(),
                sizes: vec![WidgetSize::Md, WidgetSize::Full],
                required: 3,
                optional: 10,
            }],
        };
        let out = OutputFormat::default().to_string(&list).unwrap();
        assert!(out.contains("lineChart"));
        assert!(out.contains("md,full"));
        assert!(out.contains("Total: 1 widget(s)"));
    }

    #[test]
    fn validation_report_lists_errors() {
        let mut values = WidgetFieldValueMap::new();
        values.insert("xAxis".into(), FieldValue::new().with_data("Region"));
        let report = ValidationReport {
            widget: "lineChart".into(),
            save_ready: false,
            values,
            errors: vec![FieldError::new(
                "tableDataField",
                FieldType::TableDataField,
                true,
                FieldErrorReason::Required,
            )],
        };
        let out = OutputFormat::default().to_string(&report).unwrap();
        assert!(out.contains("Save ready:  no"));
        assert!(out.contains(r#"{"data":"Region"}"#));
        assert!(out.contains("tableDataField"));
        assert!(out.contains("Total: 1 error(s)"));
    }

    #[test]
    fn check_report_counts_failures() {
        let report = TableCheckReport {
            tables: vec![
                TableCheck {
                    data_table_id: "T1".into(),
                    state: TableState::Active,
                    failure: None,
                },
                TableCheck {
                    data_table_id: "T2".into(),
                    state: TableState::Failed,
                    failure: Some(FailureReason::missing_upstream("T2", "T9")),
                },
            ],
        };
        assert_eq!(report.failed(), 1);
        let out = OutputFormat::default().to_string(&report).unwrap();
        assert!(out.contains("references missing upstream T9"));
    }

    #[test]
    fn truncate_long_title() {
        assert_eq!(truncate("Stacked Horizontal Bar Chart", 10), "Stacked...");
        assert_eq!(truncate("Gauge", 10), "Gauge");
    }
}
