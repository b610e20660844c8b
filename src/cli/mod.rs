//! Command line interface for the map packager.
//!
//! Parses arguments, builds the [`RuntimeConfig`] and dispatches to the
//! subcommand implementations in [`commands`].

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, ExportArgs, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs already-parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let config = RuntimeConfig::from(args);

    match &args.command {
        Command::Export(export) => commands::execute_export(export, &config).await,
        Command::Run(export) => commands::execute_run(export, &config).await,
        Command::Inspect { package } => commands::execute_inspect(package, &config).await,
    }
}
