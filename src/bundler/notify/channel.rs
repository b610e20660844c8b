//! Local channel to a running consumer.

use crate::bundler::ChannelError;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Best-effort delivery of one text message to a running consumer.
pub trait ConsumerChannel {
    /// Sends `message` as a single line. `Ok` means the consumer end
    /// accepted every byte.
    fn send(&self, message: &str) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

/// Unix domain socket (named pipe on Windows) the game listens on.
#[derive(Debug, Clone)]
pub struct SocketChannel {
    endpoint: PathBuf,
    timeout: Duration,
}

impl SocketChannel {
    /// Creates a channel to `endpoint`; connect and write share `timeout`.
    pub fn new(endpoint: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.as_ref().to_path_buf(),
            timeout,
        }
    }

    /// Socket path or pipe name.
    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    async fn deliver(&self, line: &[u8]) -> Result<(), ChannelError> {
        let mut stream = connect(&self.endpoint)
            .await
            .map_err(|error| ChannelError::Unreachable {
                endpoint: self.endpoint.clone(),
                error,
            })?;

        let write = async {
            stream.write_all(line).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        write.await.map_err(|error| ChannelError::Delivery {
            endpoint: self.endpoint.clone(),
            error,
        })
    }
}

impl ConsumerChannel for SocketChannel {
    async fn send(&self, message: &str) -> Result<(), ChannelError> {
        let mut line = Vec::with_capacity(message.len() + 1);
        line.extend_from_slice(message.as_bytes());
        line.push(b'\n');

        match tokio::time::timeout(self.timeout, self.deliver(&line)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ChannelError::TimedOut {
                endpoint: self.endpoint.clone(),
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(unix)]
async fn connect(endpoint: &Path) -> io::Result<tokio::net::UnixStream> {
    tokio::net::UnixStream::connect(endpoint).await
}

#[cfg(windows)]
async fn connect(
    endpoint: &Path,
) -> io::Result<tokio::net::windows::named_pipe::NamedPipeClient> {
    tokio::net::windows::named_pipe::ClientOptions::new().open(endpoint)
}
