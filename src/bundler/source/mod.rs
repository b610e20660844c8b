//! Bundle sources.
//!
//! A [`BundleSource`] turns a bundle identifier and its asset paths into the
//! bundle's bytes. Building is the asset toolchain's job; sources only
//! fetch or invoke it. Implementations must be safe to call concurrently
//! for distinct identifiers and must return identical bytes for identical
//! inputs.

mod command;
mod directory;
mod memory;

pub use command::CommandBundleSource;
pub use directory::DirectoryBundleSource;
pub use memory::MemoryBundleSource;

use crate::bundler::{BuildError, SourceSettings};
use bytes::Bytes;
use std::future::Future;

/// Produces bundle bytes on demand.
pub trait BundleSource {
    /// Materializes one bundle.
    fn build_bundle(
        &self,
        identifier: &str,
        source_paths: &[String],
    ) -> impl Future<Output = Result<Bytes, BuildError>> + Send;
}

/// Bundle source chosen at runtime from [`SourceSettings`].
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    /// Prebuilt bundle directory
    Directory(DirectoryBundleSource),
    /// External builder command
    Command(CommandBundleSource),
}

impl ConfiguredSource {
    /// Creates the source described by `settings`.
    pub fn from_settings(settings: &SourceSettings) -> Self {
        match settings {
            SourceSettings::Directory(dir) => Self::Directory(DirectoryBundleSource::new(dir)),
            SourceSettings::Command {
                program,
                args,
                timeout,
            } => Self::Command(
                CommandBundleSource::new(program, args.clone()).with_timeout(*timeout),
            ),
        }
    }
}

impl BundleSource for ConfiguredSource {
    async fn build_bundle(
        &self,
        identifier: &str,
        source_paths: &[String],
    ) -> Result<Bytes, BuildError> {
        match self {
            Self::Directory(source) => source.build_bundle(identifier, source_paths).await,
            Self::Command(source) => source.build_bundle(identifier, source_paths).await,
        }
    }
}
