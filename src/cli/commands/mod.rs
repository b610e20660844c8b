//! Command execution functions for packager operations.
//!
//! Each subcommand lives in its own module; manifest loading and settings
//! assembly shared by `export` and `run` live here.

mod export;
mod inspect;
mod run;

pub use export::execute_export;
pub use inspect::execute_inspect;
pub use run::execute_run;

use super::RuntimeConfig;
use super::args::ExportArgs;
use crate::bundler::{ConfiguredSource, ExportedPackage, Packager};
use crate::error::Result;
use crate::metadata::load_manifest;
use anyhow::Context;

/// Loads the manifest and applies command line overrides.
fn prepare(args: &ExportArgs) -> Result<(Packager, ConfiguredSource)> {
    let manifest = load_manifest(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;

    let mut builder = manifest.settings_builder();
    if let Some(output) = &args.output {
        builder = builder.output_path(output);
    }
    if let Some(jobs) = args.jobs {
        builder = builder.jobs(jobs);
    }

    let settings = builder.build()?;
    let source = ConfiguredSource::from_settings(&manifest.source);
    Ok((Packager::new(settings), source))
}

/// Prints the summary shared by `export` and `run`.
fn report(exported: &ExportedPackage, config: &RuntimeConfig) -> Result<()> {
    config.success(&format!(
        "Wrote {} ({} bytes)",
        exported.path.display(),
        exported.size
    ))?;

    config.verbose_println(&format!("sha256 {}", exported.checksum))?;
    for bundle in &exported.bundles {
        let packaged = if bundle.kind.is_framed() {
            ""
        } else {
            ", not packaged"
        };
        config.verbose_println(&format!(
            "{:<6} {} ({} bytes{})",
            bundle.kind.to_string(),
            bundle.identifier,
            bundle.size,
            packaged
        ))?;
    }
    Ok(())
}
