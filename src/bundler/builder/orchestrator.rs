//! Main export orchestration.
//!
//! This module provides the [`Packager`] that runs an export end to end:
//! plan, materialize, frame, write and optionally hand off to a consumer.

use crate::bundler::{
    BundlePlan, BundleReport, BundleSource, Error, PackageHeader, Result, Settings,
    container::assemble,
    notify::{ConsumerChannel, ConsumerLauncher, Notifier, NotifyOutcome},
    utils::fs::write_atomic,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::checksum::calculate_sha256;

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportedPackage {
    /// Where the package was written.
    pub path: PathBuf,
    /// Header framed into the package.
    pub header: PackageHeader,
    /// Total file size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the file.
    pub checksum: String,
    /// Every bundle built for the package, in plan order.
    pub bundles: Vec<BundleReport>,
}

/// Export orchestrator.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tub_packager::bundler::{
///     DirectoryBundleSource, PackageDescriptor, Packager, SettingsBuilder,
/// };
///
/// # async fn example() -> tub_packager::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package(PackageDescriptor {
///         identifier: "harbor".into(),
///         metadata_asset: Some("Assets/Missions/Harbor.asset".into()),
///         scene_root: "Assets/Scenes/Harbor.unity".into(),
///     })
///     .output_path("maps/harbor.tub")
///     .build()?;
///
/// let packager = Packager::new(settings);
/// let exported = packager
///     .export(Arc::new(DirectoryBundleSource::new("TempBundleBuild")))
///     .await?;
/// println!("Wrote {} ({} bytes)", exported.path.display(), exported.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Packager {
    settings: Settings,
}

impl Packager {
    /// Creates a packager for the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Plans the bundles for the configured package.
    pub fn plan(&self) -> Result<BundlePlan> {
        BundlePlan::for_package(self.settings.package(), self.settings.named_bundles())
    }

    /// Exports to the configured output path.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when no output path is configured, plus
    /// everything [`Packager::export_to`] can return.
    pub async fn export<S>(&self, source: Arc<S>) -> Result<ExportedPackage>
    where
        S: BundleSource + Send + Sync + 'static,
    {
        let path = self
            .settings
            .output_path()
            .ok_or_else(|| Error::configuration("no export target configured"))?
            .to_path_buf();
        self.export_to(source, &path).await
    }

    /// Exports the package to `path`.
    ///
    /// The destination is only touched once every bundle has been built and
    /// framed; any earlier failure leaves it as it was.
    pub async fn export_to<S>(&self, source: Arc<S>, path: &Path) -> Result<ExportedPackage>
    where
        S: BundleSource + Send + Sync + 'static,
    {
        let plan = self.plan()?;
        log::info!(
            "Exporting {} ({} bundles) to {}",
            self.settings.identifier(),
            plan.len(),
            path.display()
        );

        let package = assemble(&plan, source, self.settings.jobs()).await?;
        let checksum = calculate_sha256(package.data());
        let size = package.data().len() as u64;

        write_atomic(path, package.data().clone()).await?;
        log::info!("Wrote {} ({} bytes, sha256 {})", path.display(), size, checksum);

        Ok(ExportedPackage {
            path: path.to_path_buf(),
            header: package.header().clone(),
            size,
            checksum,
            bundles: package.bundles().to_vec(),
        })
    }

    /// Exports to `path`, then hands the package to a consumer.
    ///
    /// The notifier only runs after a successful write.
    pub async fn export_and_notify<S, C, L>(
        &self,
        source: Arc<S>,
        path: &Path,
        notifier: &Notifier<C, L>,
    ) -> Result<(ExportedPackage, NotifyOutcome)>
    where
        S: BundleSource + Send + Sync + 'static,
        C: ConsumerChannel,
        L: ConsumerLauncher,
    {
        let exported = self.export_to(source, path).await?;
        let outcome = notifier.notify(&exported.path).await?;
        Ok((exported, outcome))
    }
}
