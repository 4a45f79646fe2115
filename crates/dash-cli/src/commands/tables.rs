//! Data table pipeline commands.

use std::io::Write;
use std::path::Path;

use dash_tables::{DataTableStore, ResolvedTable, TableStore, resolve};
use tracing::info;

use crate::cli::TableCommands;
use crate::error::CliError;
use crate::input::load_tables;
use crate::output::{ExecutionOrder, OutputFormat, TableCheck, TableCheckReport};

/// Tables command executor.
#[derive(Debug, Default)]
pub struct TablesCommand;

impl TablesCommand {
    /// Create a new tables command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Execute a tables subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be loaded, a table is unknown
    /// or rejected, or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &TableCommands,
    ) -> Result<(), CliError> {
        match command {
            TableCommands::Resolve { tables, id } => {
                let store = Self::load(tables)?;
                format.write(writer, &Self::resolve(&store, id)?)
            }
            TableCommands::Order { tables } => {
                let store = Self::load(tables)?;
                format.write(writer, &Self::order(&store)?)
            }
            TableCommands::Check { tables } => {
                let mut store = Self::load(tables)?;
                format.write(writer, &Self::check(&mut store)?)
            }
        }
    }

    fn load(path: &Path) -> Result<DataTableStore, CliError> {
        let tables = load_tables(path)?;
        Ok(DataTableStore::from_tables(tables)?)
    }

    /// Resolve table `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unknown or cannot be resolved.
    pub fn resolve(store: &DataTableStore, id: &str) -> Result<ResolvedTable, CliError> {
        Ok(resolve(id, store)?)
    }

    /// Execution order of every table.
    ///
    /// # Errors
    ///
    /// `CycleDetected` when the tables cannot be ordered.
    pub fn order(store: &DataTableStore) -> Result<ExecutionOrder, CliError> {
        let order = store.graph().execution_order()?;
        Ok(ExecutionOrder { order })
    }

    /// Save every table in execution order.
    ///
    /// # Errors
    ///
    /// `CycleDetected` when the tables cannot be ordered, or an invalid
    /// transition for a table stored as VALIDATING.
    pub fn check(store: &mut DataTableStore) -> Result<TableCheckReport, CliError> {
        let saved = store.save_all()?;
        let tables: Vec<TableCheck> = saved
            .into_iter()
            .map(|(id, state)| {
                let failure = store.get(&id).and_then(|t| t.failure.clone());
                TableCheck {
                    data_table_id: id,
                    state,
                    failure,
                }
            })
            .collect();
        let report = TableCheckReport { tables };
        info!(
            tables = report.tables.len(),
            failed = report.failed(),
            "checked data tables"
        );
        Ok(report)
    }
}
