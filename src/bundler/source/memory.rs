//! In-memory bundle source.

use super::BundleSource;
use crate::bundler::BuildError;
use bytes::Bytes;
use std::collections::HashMap;

/// Serves fixed bundle bytes by identifier.
///
/// Useful for callers that build bundles themselves and only need the
/// container framing.
///
/// # Examples
///
/// ```
/// use tub_packager::bundler::MemoryBundleSource;
///
/// let source = MemoryBundleSource::new()
///     .with_bundle("harbor.meta", vec![1u8; 10])
///     .with_bundle("harbor.map", vec![2u8; 50]);
/// assert_eq!(source.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBundleSource {
    bundles: HashMap<String, Bytes>,
}

impl MemoryBundleSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a bundle.
    pub fn with_bundle(mut self, identifier: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(identifier, data);
        self
    }

    /// Adds or replaces a bundle in place.
    pub fn insert(&mut self, identifier: impl Into<String>, data: impl Into<Bytes>) {
        self.bundles.insert(identifier.into(), data.into());
    }

    /// Number of bundles held.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether no bundles are held.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl BundleSource for MemoryBundleSource {
    async fn build_bundle(
        &self,
        identifier: &str,
        _source_paths: &[String],
    ) -> Result<Bytes, BuildError> {
        self.bundles
            .get(identifier)
            .cloned()
            .ok_or(BuildError::Unknown)
    }
}
