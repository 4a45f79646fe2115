//! dashctl binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dash_cli::cli::{Cli, Commands};
use dash_cli::commands::{Engine, MigrateCommand, TablesCommand, ValidateCommand, WidgetsCommand};
use dash_cli::input::load_manager_config;
use dash_cli::{CliError, OutputFormat};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    let config = load_manager_config(cli.config.as_deref())?;
    let engine = Engine::new(config)?;

    match cli.command {
        Commands::Widgets { command } => {
            WidgetsCommand::new(&engine).execute(&mut stdout, &format, &command)?;
        }
        Commands::Validate(args) => {
            ValidateCommand::new(&engine).execute(&mut stdout, &format, &args)?;
        }
        Commands::Migrate(args) => {
            MigrateCommand::new(&engine).execute(&mut stdout, &format, &args)?;
        }
        Commands::Tables { command } => {
            TablesCommand::new().execute(&mut stdout, &format, &command)?;
        }
    }

    Ok(())
}
