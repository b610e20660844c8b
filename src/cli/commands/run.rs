//! `run` subcommand: export, then hand the package to the game.

use super::{prepare, report};
use crate::bundler::{Notifier, NotifyOutcome};
use crate::cli::RuntimeConfig;
use crate::cli::args::ExportArgs;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Exports the package and notifies the consumer.
///
/// Without an output from the flags or the manifest the package goes to a
/// fresh file in the system temporary directory.
pub async fn execute_run(args: &ExportArgs, config: &RuntimeConfig) -> Result<i32> {
    let (packager, source) = prepare(args)?;
    let settings = packager.settings();

    let path = match settings.output_path() {
        Some(path) => path.to_path_buf(),
        None => temporary_target(settings.identifier()),
    };

    config.progress(&format!(
        "Exporting {} to {}",
        settings.identifier(),
        path.display()
    ))?;

    let notifier = Notifier::from_settings(settings.consumer());
    let (exported, outcome) = packager
        .export_and_notify(Arc::new(source), &path, &notifier)
        .await?;

    report(&exported, config)?;
    match outcome {
        NotifyOutcome::Delivered => config.success(&format!("Package {}", outcome))?,
        NotifyOutcome::Spawned => config.warn(&format!(
            "No running consumer at {}; {}",
            settings.consumer().endpoint.display(),
            outcome
        ))?,
    }
    Ok(0)
}

fn temporary_target(identifier: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}.tub", identifier, uuid::Uuid::new_v4()))
}
