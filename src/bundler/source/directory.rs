//! Prebuilt bundle directory.

use super::BundleSource;
use crate::bundler::BuildError;
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};

/// Reads bundles the asset builder already wrote to a build directory.
///
/// The bundle for identifier `harbor.meta` is `<dir>/harbor.meta`. Asset
/// paths are ignored; the builder consumed them when it produced the file.
#[derive(Debug, Clone)]
pub struct DirectoryBundleSource {
    dir: PathBuf,
}

impl DirectoryBundleSource {
    /// Creates a source over `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Build directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the bundle for `identifier` is expected.
    pub fn bundle_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(identifier)
    }
}

impl BundleSource for DirectoryBundleSource {
    async fn build_bundle(
        &self,
        identifier: &str,
        _source_paths: &[String],
    ) -> Result<Bytes, BuildError> {
        let path = self.bundle_path(identifier);

        match tokio::fs::read(&path).await {
            Ok(data) => {
                log::debug!("Read bundle {} ({} bytes)", path.display(), data.len());
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(BuildError::Missing { path }),
            Err(e) => Err(BuildError::Io(e)),
        }
    }
}
