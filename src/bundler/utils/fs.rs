//! File system utilities for packaging.
//!
//! Package files are replaced atomically: the new content is written to a
//! temporary file next to the destination and renamed over it, so readers
//! only ever see the old package or the complete new one.

use crate::bundler::error::{Error, ErrorExt, Result};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Prefix of the temporary files created next to the destination.
const TEMP_PREFIX: &str = ".tub-";

/// Mode of a package written where no file existed before.
#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

/// Writes `data` to `path`, replacing any existing file in one step.
///
/// Missing parent directories are created. On any failure the temporary
/// file is removed and `path` is left as it was.
///
/// # Errors
///
/// [`Error::Fs`] naming the failed operation and path. No retries.
pub async fn write_atomic(path: &Path, data: Bytes) -> Result<()> {
    let target = path.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || write_atomic_blocking(&target, &data))
        .await
        .map_err(|e| Error::GenericError(format!("Package write task panicked: {}", e)))?
}

fn write_atomic_blocking(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).fs_context("creating package directory", &dir)?;

    // Dropping `temp` on an early return deletes it
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(&dir)
        .fs_context("creating temporary package in", &dir)?;

    temp.write_all(data)
        .fs_context("writing temporary package", temp.path())?;
    temp.as_file()
        .sync_all()
        .fs_context("syncing temporary package", temp.path())?;

    // Temporary files are owner-only; keep the replaced package's mode
    match std::fs::metadata(path) {
        Ok(existing) if existing.is_file() => temp
            .as_file()
            .set_permissions(existing.permissions())
            .fs_context("copying permissions to temporary package", temp.path())?,
        _ => set_default_permissions(temp.as_file())
            .fs_context("setting permissions on temporary package", temp.path())?,
    }

    temp.persist(path)
        .map_err(|e| e.error)
        .fs_context("replacing package", path)?;

    log::debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(DEFAULT_MODE))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(TEMP_PREFIX))
            })
            .collect()
    }

    #[tokio::test]
    async fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harbor.tub");
        std::fs::write(&path, b"an older and much longer package").unwrap();

        write_atomic(&path, Bytes::from_static(b"new")).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn replacement_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harbor.tub");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, Bytes::from_static(b"new")).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn new_package_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harbor.tub");

        write_atomic(&path, Bytes::from_static(b"pkg")).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, DEFAULT_MODE);
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("coast").join("harbor.tub");

        write_atomic(&path, Bytes::from_static(b"pkg")).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"pkg");
    }

    #[tokio::test]
    async fn failed_replace_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by a file
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let err = write_atomic(&path, Bytes::from_static(b"pkg")).await.unwrap_err();

        match err {
            Error::Fs { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(path.is_dir());
        assert!(leftover_temp_files(dir.path()).is_empty());
    }
}
