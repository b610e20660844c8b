//! `export` subcommand.

use super::{prepare, report};
use crate::cli::RuntimeConfig;
use crate::cli::args::ExportArgs;
use crate::error::Result;
use std::sync::Arc;

/// Exports the package to the output from the flags or the manifest.
pub async fn execute_export(args: &ExportArgs, config: &RuntimeConfig) -> Result<i32> {
    let (packager, source) = prepare(args)?;

    config.progress(&format!(
        "Exporting {} ({} jobs)",
        packager.settings().identifier(),
        packager.settings().jobs()
    ))?;

    let exported = packager.export(Arc::new(source)).await?;
    report(&exported, config)?;
    Ok(0)
}
