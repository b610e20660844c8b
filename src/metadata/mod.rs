//! Package manifest loading.
//!
//! A manifest is a TOML file describing one package: its descriptor, the
//! named bundles registered with the asset builder, where bundle bytes come
//! from, the export target and how to reach the game.
//!
//! ```toml
//! [package]
//! identifier = "harbor"
//! metadata = "Assets/Missions/Harbor.asset"
//! scene = "Assets/Scenes/Harbor.unity"
//!
//! [[bundles]]
//! name = "props"
//! assets = ["Assets/Props/Crate.prefab"]
//!
//! [source]
//! directory = "TempBundleBuild"
//!
//! [export]
//! output = "maps/harbor.tub"
//!
//! [consumer]
//! program = "xdg-open"
//! args = ["steam://run/790910//-cmd='{command}'"]
//! ```

use crate::bundler::{
    ConsumerSettings, DEFAULT_BUILD_TIMEOUT, LauncherSettings, NamedBundle, PackageDescriptor,
    SettingsBuilder, SourceSettings,
};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parsed package manifest with paths resolved against its directory.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    /// Package identity and root assets
    pub package: PackageDescriptor,

    /// Bundles registered with the asset builder
    pub named_bundles: Vec<NamedBundle>,

    /// Bundle source
    pub source: SourceSettings,

    /// Export target, if the manifest names one
    pub output: Option<PathBuf>,

    /// Build parallelism, if the manifest sets one
    pub jobs: Option<usize>,

    /// Consumer hand-off
    pub consumer: ConsumerSettings,
}

impl PackageManifest {
    /// Starts a [`SettingsBuilder`] pre-filled from the manifest.
    ///
    /// Callers apply their own overrides before building.
    pub fn settings_builder(&self) -> SettingsBuilder {
        let mut builder = SettingsBuilder::new()
            .package(self.package.clone())
            .named_bundles(self.named_bundles.clone())
            .consumer(self.consumer.clone());

        if let Some(output) = &self.output {
            builder = builder.output_path(output);
        }
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }
        builder
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    package: PackageSection,
    #[serde(default)]
    bundles: Vec<NamedBundle>,
    source: SourceSection,
    #[serde(default)]
    export: ExportSection,
    #[serde(default)]
    consumer: ConsumerSection,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageSection {
    identifier: String,
    metadata: Option<PathBuf>,
    scene: PathBuf,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceSection {
    directory: Option<PathBuf>,
    command: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ExportSection {
    output: Option<PathBuf>,
    jobs: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConsumerSection {
    endpoint: Option<PathBuf>,
    timeout_ms: Option<u64>,
    program: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

/// Loads a package manifest.
///
/// Relative `source.directory`, `export.output` and a builder program given
/// as a relative path resolve against the manifest's directory. Asset paths
/// are passed through untouched.
pub fn load_manifest(manifest_path: &Path) -> Result<PackageManifest> {
    let text = std::fs::read_to_string(manifest_path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_manifest".to_string(),
            reason: format!("Failed to read {}: {}", manifest_path.display(), e),
        })
    })?;

    let file: ManifestFile = toml::from_str(&text)?;

    let base_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let source = parse_source(file.source, base_dir)?;
    let consumer = parse_consumer(file.consumer);

    log::debug!(
        "Loaded manifest {} for package {} ({} named bundles)",
        manifest_path.display(),
        file.package.identifier,
        file.bundles.len()
    );

    Ok(PackageManifest {
        package: PackageDescriptor {
            identifier: file.package.identifier,
            metadata_asset: file.package.metadata,
            scene_root: file.package.scene,
        },
        named_bundles: file.bundles,
        source,
        output: file.export.output.map(|output| base_dir.join(output)),
        jobs: file.export.jobs,
        consumer,
    })
}

fn parse_source(section: SourceSection, base_dir: &Path) -> Result<SourceSettings> {
    match (section.directory, section.command) {
        (Some(directory), None) => Ok(SourceSettings::Directory(base_dir.join(directory))),
        (None, Some(command)) => {
            let mut parts = command.into_iter();
            let program = parts.next().filter(|p| !p.is_empty()).ok_or_else(|| {
                BundlerError::Cli(CliError::InvalidArguments {
                    reason: "source.command must name a program".to_string(),
                })
            })?;

            // Bare names are looked up on PATH when the builder runs
            let program = if Path::new(&program).components().count() > 1 {
                base_dir.join(program)
            } else {
                PathBuf::from(program)
            };

            Ok(SourceSettings::Command {
                program,
                args: parts.collect(),
                timeout: section
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_BUILD_TIMEOUT),
            })
        }
        (Some(_), Some(_)) => Err(BundlerError::Cli(CliError::ConflictingArguments {
            arguments: vec!["source.directory".to_string(), "source.command".to_string()],
        })),
        (None, None) => Err(BundlerError::Cli(CliError::MissingArgument {
            argument: "source.directory or source.command".to_string(),
        })),
    }
}

fn parse_consumer(section: ConsumerSection) -> ConsumerSettings {
    let defaults = ConsumerSettings::default();
    ConsumerSettings {
        endpoint: section.endpoint.unwrap_or(defaults.endpoint),
        timeout: section
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout),
        launcher: section.program.map(|program| LauncherSettings {
            program,
            args: section.args,
        }),
    }
}
