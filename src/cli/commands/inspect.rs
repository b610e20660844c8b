//! `inspect` subcommand.

use crate::bundler::PackageContents;
use crate::bundler::builder::checksum::calculate_file_sha256;
use crate::cli::RuntimeConfig;
use crate::error::Result;
use anyhow::Context;
use std::path::Path;

/// Prints the header and section layout of an existing package.
pub async fn execute_inspect(package: &Path, config: &RuntimeConfig) -> Result<i32> {
    let contents = PackageContents::read(package)
        .await
        .with_context(|| format!("Failed to inspect {}", package.display()))?;
    let checksum = calculate_file_sha256(package).await?;
    let header = contents.header();

    config.section(&package.display().to_string())?;
    config.indent(&format!("version  {}", header.version))?;
    config.indent(&format!("header   {} bytes", contents.header_len()))?;
    config.indent(&format!("meta     {} bytes", contents.meta().len()))?;
    for (index, scene) in contents.scenes().iter().enumerate() {
        config.indent(&format!("scene {}  {} bytes", index, scene.len()))?;
    }
    config.indent(&format!("sha256   {}", checksum))?;
    Ok(0)
}
