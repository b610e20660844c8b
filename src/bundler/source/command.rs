//! External asset builder invocation.

use super::BundleSource;
use crate::bundler::{BuildError, DEFAULT_BUILD_TIMEOUT};
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Runs an asset builder once per bundle.
///
/// The builder is invoked as `<program> <args...> <identifier> <asset...>`
/// and must write the bundle to stdout. A non-zero exit fails the bundle
/// with the captured stderr.
#[derive(Debug, Clone)]
pub struct CommandBundleSource {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandBundleSource {
    /// Creates a source running `program` with leading `args`.
    pub fn new(program: impl AsRef<Path>, args: Vec<String>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args,
            timeout: DEFAULT_BUILD_TIMEOUT,
        }
    }

    /// Sets the per-bundle timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder program.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl BundleSource for CommandBundleSource {
    async fn build_bundle(
        &self,
        identifier: &str,
        source_paths: &[String],
    ) -> Result<Bytes, BuildError> {
        log::debug!(
            "Building bundle {} with {} ({} assets)",
            identifier,
            self.program.display(),
            source_paths.len()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(identifier)
            .args(source_paths)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| BuildError::Spawn {
                command: self.program.display().to_string(),
                error,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain stdout and stderr concurrently, then wait for exit
        let run = async {
            let (out, err) = tokio::join!(read_all(stdout), read_all(stderr));
            let status = child.wait().await?;
            Ok::<_, io::Error>((status, out?, err?))
        };
        let outcome = tokio::time::timeout(self.timeout, run).await;

        match outcome {
            Ok(Ok((status, out, _))) if status.success() => Ok(Bytes::from(out)),
            Ok(Ok((status, _, err))) => Err(BuildError::Failed {
                status,
                stderr: String::from_utf8_lossy(&err).trim().to_string(),
            }),
            Ok(Err(e)) => Err(BuildError::Io(e)),
            Err(_elapsed) => {
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill builder for {}: {}", identifier, e);
                }
                Err(BuildError::TimedOut {
                    timeout: self.timeout,
                })
            }
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buffer).await?;
    }
    Ok(buffer)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stdout_becomes_bundle_bytes() {
        let source = CommandBundleSource::new(
            "sh",
            vec!["-c".into(), "printf '%s|%s' \"$0\" \"$1\"".into()],
        );
        let bytes = source
            .build_bundle("harbor.meta", &["Assets/Harbor.asset".into()])
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"harbor.meta|Assets/Harbor.asset");
    }

    #[tokio::test]
    async fn failing_builder_reports_stderr() {
        let source = CommandBundleSource::new(
            "sh",
            vec!["-c".into(), "echo 'missing asset' >&2; exit 3".into()],
        );
        match source.build_bundle("harbor.map", &[]).await {
            Err(BuildError::Failed { status, stderr }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "missing asset");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_builder_times_out() {
        let source = CommandBundleSource::new("sh", vec!["-c".into(), "sleep 5".into()])
            .with_timeout(Duration::from_millis(100));
        assert!(matches!(
            source.build_bundle("harbor.map", &[]).await,
            Err(BuildError::TimedOut { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_program_is_spawn_error() {
        let source = CommandBundleSource::new("/nonexistent/asset-builder", vec![]);
        assert!(matches!(
            source.build_bundle("harbor.map", &[]).await,
            Err(BuildError::Spawn { .. })
        ));
    }
}
