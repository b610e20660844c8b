//! Package checksum calculation.
//!
//! SHA-256 over the complete package stream, reported after an export and
//! by `inspect` so two exports can be compared at a glance.

use crate::bundler::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Hex-encoded SHA-256 of an in-memory package.
pub fn calculate_sha256(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Hex-encoded SHA-256 of a package file.
///
/// Reads the file in 8KB chunks.
pub async fn calculate_file_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening package for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading package for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
