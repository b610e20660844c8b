//! Package parsing, the consumer side of the container format.

use super::header::PackageHeader;
use crate::bundler::{Error, ErrorExt, Result};
use bytes::Bytes;
use std::path::Path;

/// A parsed package with its sections sliced out.
///
/// Sections share the buffer the package was parsed from.
#[derive(Debug, Clone)]
pub struct PackageContents {
    header: PackageHeader,
    header_len: usize,
    meta: Bytes,
    scenes: Vec<Bytes>,
}

impl PackageContents {
    /// Parses a complete package.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedVersion`] for an unknown header version
    /// - [`Error::MalformedPackage`] when the framing is broken or the
    ///   declared sizes do not account for exactly the bytes present
    pub fn parse(data: Bytes) -> Result<Self> {
        let (header, header_len) = PackageHeader::from_framed_bytes(&data)?;

        let available = (data.len() - header_len) as u64;
        let declared = header.body_len().ok_or_else(|| {
            Error::MalformedPackage("declared section sizes overflow".to_string())
        })?;
        if declared != available {
            return Err(Error::MalformedPackage(format!(
                "header declares {declared} bytes of bundles but {available} follow"
            )));
        }

        // Sizes fit in `available`, so the casts and slices below are in range
        let mut offset = header_len;
        let mut take = |size: u64| {
            let start = offset;
            offset += size as usize;
            data.slice(start..offset)
        };

        let meta = take(header.meta_bundle.size);
        let scenes = header
            .scene_bundles
            .iter()
            .map(|section| take(section.size))
            .collect();

        Ok(Self {
            header,
            header_len,
            meta,
            scenes,
        })
    }

    /// Reads and parses a package file.
    pub async fn read(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .fs_context("reading package", path)?;
        Self::parse(Bytes::from(data))
    }

    /// Parsed header.
    pub fn header(&self) -> &PackageHeader {
        &self.header
    }

    /// Bytes taken by the length prefix and header text.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Metadata bundle bytes.
    pub fn meta(&self) -> &Bytes {
        &self.meta
    }

    /// Scene bundle bytes in header order.
    pub fn scenes(&self) -> &[Bytes] {
        &self.scenes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(header: &PackageHeader, body: &[u8]) -> Bytes {
        let mut data = header.to_framed_bytes().unwrap();
        data.extend_from_slice(body);
        Bytes::from(data)
    }

    #[test]
    fn slices_sections_by_declared_sizes() {
        let header = PackageHeader::new(3, [2, 4]);
        let contents = PackageContents::parse(package(&header, b"mmmaabbbb")).unwrap();

        assert_eq!(&contents.meta()[..], b"mmm");
        assert_eq!(contents.scenes().len(), 2);
        assert_eq!(&contents.scenes()[0][..], b"aa");
        assert_eq!(&contents.scenes()[1][..], b"bbbb");
        assert_eq!(contents.header(), &header);
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let header = PackageHeader::new(3, [2]);
        let err = PackageContents::parse(package(&header, b"mmmaaX")).unwrap_err();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }

    #[test]
    fn missing_bytes_are_malformed() {
        let header = PackageHeader::new(3, [2]);
        let err = PackageContents::parse(package(&header, b"mmma")).unwrap_err();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }

    #[test]
    fn empty_scene_list_is_valid() {
        let header = PackageHeader::new(1, []);
        let contents = PackageContents::parse(package(&header, b"m")).unwrap();
        assert!(contents.scenes().is_empty());
    }
}
