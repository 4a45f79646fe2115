//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// dashctl - offline tooling for dashboard widgets and data tables.
#[derive(Parser, Debug, Clone)]
#[command(name = "dashctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, env = "DASHCTL_FORMAT", default_value_t = Format::Table)]
    pub format: Format,

    /// Field value manager settings (JSON).
    #[arg(short, long, env = "DASHCTL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Inspect registered widget configs.
    Widgets {
        /// Widgets subcommand to execute.
        #[command(subcommand)]
        command: WidgetCommands,
    },

    /// Build and validate the field values of a widget.
    ///
    /// Exits with status 2 when the widget is not ready to be saved.
    Validate(ValidateArgs),

    /// Convert legacy widget options to field values.
    Migrate(MigrateArgs),

    /// Data table pipeline commands.
    Tables {
        /// Tables subcommand to execute.
        #[command(subcommand)]
        command: TableCommands,
    },
}

/// Widgets subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum WidgetCommands {
    /// List every registered widget.
    List,

    /// Show the resolved fields of one widget.
    Show {
        /// Widget name, e.g. `lineChart`.
        name: String,
    },
}

/// Arguments for the validate command.
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Widget name.
    #[arg(short, long)]
    pub widget: String,

    /// Field values (JSON object of key to value).
    #[arg(long, value_name = "FILE")]
    pub values: PathBuf,
}

/// Arguments for the migrate command.
#[derive(Parser, Debug, Clone)]
pub struct MigrateArgs {
    /// Widget name.
    #[arg(short, long)]
    pub widget: String,

    /// Legacy options (JSON object).
    #[arg(long, value_name = "FILE")]
    pub options: PathBuf,
}

/// Tables subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TableCommands {
    /// Resolve one table into the operations that produce it.
    Resolve {
        /// Data tables (JSON array).
        #[arg(short, long, value_name = "FILE")]
        tables: PathBuf,

        /// Table id to resolve.
        id: String,
    },

    /// Print the execution order of every table.
    Order {
        /// Data tables (JSON array).
        #[arg(short, long, value_name = "FILE")]
        tables: PathBuf,
    },

    /// Save every table in execution order and report the states.
    Check {
        /// Data tables (JSON array).
        #[arg(short, long, value_name = "FILE")]
        tables: PathBuf,
    },
}
