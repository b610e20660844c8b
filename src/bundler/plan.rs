//! Bundle planning.
//!
//! A [`BundlePlan`] lists every bundle an export must materialize, in the
//! order the container is assembled. It is rebuilt for each export and
//! never persisted.

use crate::bundler::{Error, NamedBundle, PackageDescriptor, Result};
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path};

/// Role of a bundle within a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleKind {
    /// Package metadata; the first section after the header.
    Meta,
    /// Scene content; framed after the metadata in plan order.
    Scene,
    /// Pre-registered shared bundle; built but not framed.
    Named,
}

impl BundleKind {
    /// Whether the consumer reads this bundle out of the container.
    pub fn is_framed(self) -> bool {
        matches!(self, Self::Meta | Self::Scene)
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Meta => "meta",
            Self::Scene => "scene",
            Self::Named => "named",
        };
        f.write_str(name)
    }
}

/// One bundle to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    identifier: String,
    kind: BundleKind,
    source_paths: Vec<String>,
}

impl PlanEntry {
    /// Creates a plan entry.
    pub fn new(identifier: impl Into<String>, kind: BundleKind, source_paths: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            source_paths,
        }
    }

    /// Bundle identifier passed to the bundle source.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Bundle role.
    pub fn kind(&self) -> BundleKind {
        self.kind
    }

    /// Asset paths the bundle is built from.
    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }
}

/// Ordered list of bundles for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePlan {
    entries: Vec<PlanEntry>,
    meta_index: usize,
}

impl BundlePlan {
    /// Plans the bundles for a package.
    ///
    /// The plan holds every named bundle in the given order, then the
    /// metadata bundle, then the scene bundle. Meta precedes Scene because
    /// the consumer reads sections positionally.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when the descriptor has no metadata asset,
    /// an empty identifier, or when bundle identifiers collide. No build
    /// work has happened at that point.
    pub fn for_package(package: &PackageDescriptor, named: &[NamedBundle]) -> Result<Self> {
        if package.identifier.trim().is_empty() {
            return Err(Error::configuration("package identifier is empty"));
        }

        let metadata_asset = package
            .metadata_asset
            .as_ref()
            .ok_or_else(|| Error::configuration("missing metadata reference"))?;

        let mut entries: Vec<PlanEntry> = named
            .iter()
            .map(|bundle| {
                PlanEntry::new(
                    bundle.name.clone(),
                    BundleKind::Named,
                    bundle.asset_paths.clone(),
                )
            })
            .collect();

        entries.push(PlanEntry::new(
            package.meta_identifier(),
            BundleKind::Meta,
            vec![metadata_asset.to_string_lossy().into_owned()],
        ));
        entries.push(PlanEntry::new(
            package.scene_identifier(),
            BundleKind::Scene,
            vec![package.scene_root.to_string_lossy().into_owned()],
        ));

        Self::from_entries(entries)
    }

    /// Builds a plan from explicit entries.
    ///
    /// Allows several scene bundles. Exactly one metadata entry is required.
    /// Identifiers must be unique, non-empty file names without path
    /// components, since directory sources resolve them inside the build
    /// directory.
    pub fn from_entries(entries: Vec<PlanEntry>) -> Result<Self> {
        let metas: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.kind == BundleKind::Meta)
            .map(|(index, _)| index)
            .collect();
        let [meta_index] = metas[..] else {
            return Err(Error::configuration(format!(
                "a package needs exactly one metadata bundle, found {}",
                metas.len()
            )));
        };

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !is_plain_name(&entry.identifier) {
                return Err(Error::configuration(format!(
                    "bundle identifier `{}` must be a single file name",
                    entry.identifier
                )));
            }
            if !seen.insert(entry.identifier.as_str()) {
                return Err(Error::configuration(format!(
                    "duplicate bundle identifier `{}`",
                    entry.identifier
                )));
            }
        }

        Ok(Self {
            entries,
            meta_index,
        })
    }

    /// All entries in assembly order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan is empty. A valid plan never is.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The metadata entry.
    pub fn meta(&self) -> &PlanEntry {
        &self.entries[self.meta_index]
    }

    /// Scene entries in plan order.
    pub fn scenes(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == BundleKind::Scene)
    }
}

fn is_plain_name(identifier: &str) -> bool {
    let mut components = Path::new(identifier).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == identifier
    )
}
