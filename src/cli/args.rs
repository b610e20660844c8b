//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation of
//! the combinations clap cannot express.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Map packager for the Tub mod loader
#[derive(Parser, Debug)]
#[command(
    name = "tub_packager",
    version,
    about = "Packs map bundles into a .tub package",
    long_about = "Builds the metadata and scene bundles of a map, frames them into a single .tub package and optionally hands the package to a running game.

Usage:
  tub_packager export --manifest harbor.toml
  tub_packager export --manifest harbor.toml --output /tmp/harbor.tub --jobs 4
  tub_packager run --manifest harbor.toml
  tub_packager inspect maps/harbor.tub

Exit code 0 = package written (and, for run, delivered or launched)."
)]
pub struct Args {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Print only errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print per-bundle details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a package to disk
    Export(ExportArgs),

    /// Export a package and hand it to the game
    Run(ExportArgs),

    /// Print the header and sections of an existing package
    Inspect {
        /// Package file to read
        #[arg(value_name = "PACKAGE")]
        package: PathBuf,
    },
}

/// Arguments shared by `export` and `run`
#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Package manifest
    #[arg(short, long, value_name = "PATH", env = "TUB_MANIFEST")]
    pub manifest: PathBuf,

    /// Output path, overriding `export.output` from the manifest
    ///
    /// Parent directories are created when missing.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum number of bundles built concurrently
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Export(export) | Command::Run(export) => {
                if export.jobs == Some(0) {
                    return Err("--jobs must be at least 1".to_string());
                }
                if export.manifest.as_os_str().is_empty() {
                    return Err("--manifest cannot be empty".to_string());
                }
            }
            Command::Inspect { package } => {
                if package.as_os_str().is_empty() {
                    return Err("Package path cannot be empty".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet);
        Self { output }
    }
}

impl RuntimeConfig {
    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
