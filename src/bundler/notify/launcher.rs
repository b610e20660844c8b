//! Starting a new consumer process.

use super::RunDirective;
use crate::bundler::{Error, LauncherSettings, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Placeholder expanded to the full `run;<path>` directive.
pub const COMMAND_PLACEHOLDER: &str = "{command}";

/// Placeholder expanded to the absolute package path.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Starts a consumer that will load the package on startup.
pub trait ConsumerLauncher {
    /// Launches a new consumer carrying `directive`. Does not wait for it.
    fn launch(&self, directive: &RunDirective) -> Result<()>;
}

/// Launches the game (or a URL handler for it) as a detached process.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    settings: Option<LauncherSettings>,
}

impl ProcessLauncher {
    /// Creates a launcher running `program` with the argument template `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            settings: Some(LauncherSettings {
                program: program.into(),
                args,
            }),
        }
    }

    /// Creates a launcher from optional settings. Without settings every
    /// launch fails with a configuration error.
    pub fn from_settings(settings: Option<&LauncherSettings>) -> Self {
        Self {
            settings: settings.cloned(),
        }
    }

    /// Expands the argument template for `directive`.
    ///
    /// When no argument carries a placeholder the directive is appended.
    pub fn arguments(&self, directive: &RunDirective) -> Vec<String> {
        let Some(settings) = &self.settings else {
            return Vec::new();
        };

        let command = directive.to_string();
        let path = directive.path().display().to_string();
        let templated = settings
            .args
            .iter()
            .any(|arg| arg.contains(COMMAND_PLACEHOLDER) || arg.contains(PATH_PLACEHOLDER));

        let mut args: Vec<String> = settings
            .args
            .iter()
            .map(|arg| {
                arg.replace(COMMAND_PLACEHOLDER, &command)
                    .replace(PATH_PLACEHOLDER, &path)
            })
            .collect();
        if !templated {
            args.push(command);
        }
        args
    }
}

impl ConsumerLauncher for ProcessLauncher {
    fn launch(&self, directive: &RunDirective) -> Result<()> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| Error::configuration("no consumer launcher configured"))?;

        let program = resolve_program(&settings.program);
        let args = self.arguments(directive);
        log::info!("Launching consumer: {} {}", program.display(), args.join(" "));

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| Error::Launch {
                program: settings.program.clone(),
                error,
            })?;

        log::debug!("Consumer started with pid {}", child.id());
        Ok(())
    }
}

/// Looks `program` up on `PATH`, falling back to the name as given.
fn resolve_program(program: &str) -> PathBuf {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            path
        }
        Err(e) => {
            log::debug!("{} not found in PATH ({}), trying it as given", program, e);
            PathBuf::from(program)
        }
    }
}
