//! Named bundle definitions.

use serde::Deserialize;

/// A bundle already registered with the asset build environment.
///
/// Named bundles are built alongside the package's own bundles so that the
/// consumer can resolve shared assets, but they are not framed into the
/// container itself.
///
/// # Configuration
///
/// ```toml
/// [[bundles]]
/// name = "props"
/// assets = ["Assets/Props/Crate.prefab", "Assets/Props/Barrel.prefab"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedBundle {
    /// Bundle name as registered with the asset builder.
    pub name: String,

    /// Asset paths assigned to the bundle, in builder order.
    #[serde(default, rename = "assets")]
    pub asset_paths: Vec<String>,
}

impl NamedBundle {
    /// Creates a named bundle.
    pub fn new(name: impl Into<String>, asset_paths: Vec<String>) -> Self {
        Self {
            name: name.into(),
            asset_paths,
        }
    }
}
