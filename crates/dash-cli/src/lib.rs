//! # dash-cli
//!
//! `dashctl`, offline tooling over the dashboard widget engine.
//!
//! Provides commands for:
//! - Inspecting the registered widget configs
//! - Building and validating widget field values
//! - Migrating legacy widget options
//! - Resolving, ordering and checking data table pipelines
//!
//! Every command reads JSON files and writes either a table or JSON. No
//! network access is involved.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Cli, Commands, Format, TableCommands, WidgetCommands};
pub use commands::Engine;
pub use error::CliError;
pub use output::OutputFormat;
