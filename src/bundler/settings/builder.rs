//! Builder for constructing Settings.

use super::{ConsumerSettings, NamedBundle, PackageDescriptor, Settings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```
/// use tub_packager::bundler::{NamedBundle, PackageDescriptor, SettingsBuilder};
///
/// # fn example() -> tub_packager::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package(PackageDescriptor {
///         identifier: "harbor".into(),
///         metadata_asset: Some("Assets/Missions/Harbor.asset".into()),
///         scene_root: "Assets/Scenes/Harbor.unity".into(),
///     })
///     .named_bundles(vec![NamedBundle::new("props", vec!["Assets/Props/Crate.prefab".into()])])
///     .build()?;
/// assert!(settings.output_path().is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    package: Option<PackageDescriptor>,
    named_bundles: Vec<NamedBundle>,
    output_path: Option<PathBuf>,
    jobs: Option<usize>,
    consumer: ConsumerSettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the package descriptor.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package(mut self, package: PackageDescriptor) -> Self {
        self.package = Some(package);
        self
    }

    /// Sets the bundles already registered with the build environment.
    ///
    /// Default: Empty
    pub fn named_bundles(mut self, bundles: Vec<NamedBundle>) -> Self {
        self.named_bundles = bundles;
        self
    }

    /// Sets the export target.
    ///
    /// Default: None (each export call must name a path)
    pub fn output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets how many bundles may be materialized concurrently.
    ///
    /// Default: number of logical CPUs
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Sets the live consumer hand-off settings.
    ///
    /// Default: platform endpoint, 500 ms timeout, no launcher
    pub fn consumer(mut self, consumer: ConsumerSettings) -> Self {
        self.consumer = consumer;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the package descriptor is missing.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let jobs = self.jobs.unwrap_or_else(num_cpus::get);

        Ok(Settings::new(
            self.package.context("package is required")?,
            self.named_bundles,
            self.output_path,
            jobs,
            self.consumer,
        ))
    }
}
