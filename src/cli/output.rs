//! Terminal output for the CLI.
//!
//! Progress and results go to stdout, warnings to stderr. Quiet mode
//! silences both; errors are printed by `main`.

use std::io::{self, Write};

/// Writes user-facing messages according to the verbosity flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Print a message only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.is_verbose() {
            writeln!(io::stdout().lock(), "  {}", message)?;
        }
        Ok(())
    }

    /// Print a progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout().lock(), "==> {}", message)?;
        }
        Ok(())
    }

    /// Print a success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout().lock(), "ok: {}", message)?;
        }
        Ok(())
    }

    /// Print a warning to stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stderr().lock(), "warning: {}", message)?;
        }
        Ok(())
    }

    /// Print a section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if !self.quiet {
            let mut out = io::stdout().lock();
            writeln!(out)?;
            writeln!(out, "{}", title)?;
            writeln!(out, "{}", "-".repeat(title.len()))?;
        }
        Ok(())
    }

    /// Print an indented line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout().lock(), "    {}", message)?;
        }
        Ok(())
    }
}
