//! Core Settings struct and implementations.

use super::{ConsumerSettings, NamedBundle, PackageDescriptor};
use std::path::{Path, PathBuf};

/// Main settings for an export.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). Everything
/// the pipeline needs is carried here explicitly; nothing is read from
/// ambient state.
///
/// # Examples
///
/// ```
/// use tub_packager::bundler::{PackageDescriptor, SettingsBuilder};
///
/// # fn example() -> tub_packager::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package(PackageDescriptor {
///         identifier: "harbor".into(),
///         metadata_asset: Some("Assets/Missions/Harbor.asset".into()),
///         scene_root: "Assets/Scenes/Harbor.unity".into(),
///     })
///     .output_path("maps/harbor.tub")
///     .jobs(4)
///     .build()?;
///
/// assert_eq!(settings.identifier(), "harbor");
/// assert_eq!(settings.jobs(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package being exported.
    package: PackageDescriptor,

    /// Bundles registered with the build environment, in enumeration order.
    named_bundles: Vec<NamedBundle>,

    /// Explicit export target.
    ///
    /// None means the caller must supply a path per export.
    output_path: Option<PathBuf>,

    /// Maximum number of bundles materialized at once.
    jobs: usize,

    /// Live consumer hand-off.
    consumer: ConsumerSettings,
}

impl Settings {
    /// Returns the package descriptor.
    pub fn package(&self) -> &PackageDescriptor {
        &self.package
    }

    /// Returns the package identifier.
    pub fn identifier(&self) -> &str {
        &self.package.identifier
    }

    /// Returns the named bundles.
    pub fn named_bundles(&self) -> &[NamedBundle] {
        &self.named_bundles
    }

    /// Returns the configured export target, if any.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Returns the build parallelism (always at least 1).
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Returns the consumer settings.
    pub fn consumer(&self) -> &ConsumerSettings {
        &self.consumer
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageDescriptor,
        named_bundles: Vec<NamedBundle>,
        output_path: Option<PathBuf>,
        jobs: usize,
        consumer: ConsumerSettings,
    ) -> Self {
        Self {
            package,
            named_bundles,
            output_path,
            jobs: jobs.max(1),
            consumer,
        }
    }
}
