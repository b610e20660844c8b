//! Package header record and its framing.
//!
//! The header is JSON text prefixed with its UTF-8 byte length as a 7-bit
//! varint. Key names and order are fixed by the game's loader:
//!
//! ```text
//! {"Version":1,"Meta":{"Size":10},"Scenes":[{"Size":50}]}
//! ```

use super::varint;
use crate::bundler::{Error, Result};
use serde::{Deserialize, Serialize};

/// Format revision written by this crate and the only one it reads.
pub const HEADER_VERSION: u32 = 1;

/// Size record of one framed bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSection {
    /// Byte length of the section.
    #[serde(rename = "Size")]
    pub size: u64,
}

/// Header at the start of every package file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageHeader {
    /// Format revision.
    #[serde(rename = "Version")]
    pub version: u32,

    /// Metadata bundle, the first section after the header.
    #[serde(rename = "Meta")]
    pub meta_bundle: BundleSection,

    /// Scene bundles, in the order their bytes follow the metadata.
    #[serde(rename = "Scenes")]
    pub scene_bundles: Vec<BundleSection>,
}

/// Only the version key, so an unknown revision is rejected before the
/// rest of the header is interpreted.
#[derive(Deserialize)]
struct VersionProbe {
    #[serde(rename = "Version")]
    version: u32,
}

impl PackageHeader {
    /// Creates a current-version header from section lengths.
    pub fn new(meta_size: u64, scene_sizes: impl IntoIterator<Item = u64>) -> Self {
        Self {
            version: HEADER_VERSION,
            meta_bundle: BundleSection { size: meta_size },
            scene_bundles: scene_sizes
                .into_iter()
                .map(|size| BundleSection { size })
                .collect(),
        }
    }

    /// Total bytes the header declares after itself.
    ///
    /// `None` if the sum overflows, which no real file can satisfy.
    pub fn body_len(&self) -> Option<u64> {
        self.scene_bundles
            .iter()
            .try_fold(self.meta_bundle.size, |total, section| {
                total.checked_add(section.size)
            })
    }

    /// Serializes the header with its length prefix.
    pub fn to_framed_bytes(&self) -> Result<Vec<u8>> {
        let text = serde_json::to_vec(self)?;
        let len = u32::try_from(text.len())
            .ok()
            .filter(|len| i32::try_from(*len).is_ok())
            .ok_or_else(|| Error::GenericError("package header text too large".to_string()))?;

        let mut framed = Vec::with_capacity(varint::MAX_VARINT_LEN + text.len());
        varint::encode(len, &mut framed);
        framed.extend_from_slice(&text);
        Ok(framed)
    }

    /// Parses a framed header from the start of `bytes`.
    ///
    /// Returns the header and the number of bytes it occupies (prefix
    /// included).
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedVersion`] for any version other than
    /// [`HEADER_VERSION`]; [`Error::MalformedPackage`] for broken framing or
    /// text.
    pub fn from_framed_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        let (text_len, prefix_len) = varint::decode(bytes)?;
        let end = prefix_len + text_len as usize;
        let text = bytes.get(prefix_len..end).ok_or_else(|| {
            Error::MalformedPackage(format!(
                "header declares {text_len} bytes but only {} follow",
                bytes.len() - prefix_len
            ))
        })?;

        let probe: VersionProbe = serde_json::from_slice(text)
            .map_err(|e| Error::MalformedPackage(format!("unreadable header: {e}")))?;
        if probe.version != HEADER_VERSION {
            return Err(Error::UnsupportedVersion {
                found: probe.version,
                expected: HEADER_VERSION,
            });
        }

        let header: Self = serde_json::from_slice(text)
            .map_err(|e| Error::MalformedPackage(format!("unreadable header: {e}")))?;
        Ok((header, end))
    }
}
