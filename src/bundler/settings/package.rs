//! Package descriptor.

use std::path::PathBuf;

/// Identity and root assets of the package being exported.
///
/// The caller resolves this (from a manifest, an editor selection, ...) and
/// hands it to the packager. Nothing in the pipeline looks it up on its own.
///
/// # Examples
///
/// ```
/// use tub_packager::bundler::PackageDescriptor;
///
/// let descriptor = PackageDescriptor {
///     identifier: "harbor".into(),
///     metadata_asset: Some("Assets/Missions/Harbor.asset".into()),
///     scene_root: "Assets/Scenes/Harbor.unity".into(),
/// };
/// assert_eq!(descriptor.meta_identifier(), "harbor.meta");
/// assert_eq!(descriptor.scene_identifier(), "harbor.map");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package identifier, used to name the derived bundles.
    pub identifier: String,

    /// Asset holding the package metadata (mission definition).
    ///
    /// Required for export. `None` fails planning with a configuration error.
    pub metadata_asset: Option<PathBuf>,

    /// Root asset of the active scene.
    pub scene_root: PathBuf,
}

impl PackageDescriptor {
    /// Identifier of the synthesized metadata bundle.
    pub fn meta_identifier(&self) -> String {
        format!("{}.meta", self.identifier)
    }

    /// Identifier of the synthesized scene bundle.
    pub fn scene_identifier(&self) -> String {
        format!("{}.map", self.identifier)
    }
}
