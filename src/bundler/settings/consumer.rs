//! Live consumer hand-off settings.

use std::{path::PathBuf, time::Duration};

/// Default time allowed for connecting to and writing to a live consumer.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_millis(500);

/// How to reach a running consumer and how to start one.
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    /// Unix socket path, or named pipe name on Windows.
    pub endpoint: PathBuf,

    /// Connect + write timeout for the notify message.
    pub timeout: Duration,

    /// Fallback launcher. `None` disables the spawn fallback.
    pub launcher: Option<LauncherSettings>,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: DEFAULT_NOTIFY_TIMEOUT,
            launcher: None,
        }
    }
}

/// Program used to start a new consumer.
///
/// Arguments may contain `{command}` (the full `run;<path>` directive) and
/// `{path}` (the absolute package path). When none does, the directive is
/// appended as the last argument.
///
/// # Example
///
/// ```toml
/// [consumer]
/// program = "xdg-open"
/// args = ["steam://run/790910//-cmd='{command}'"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    /// Program name or path.
    pub program: String,

    /// Argument template.
    pub args: Vec<String>,
}

/// Platform default channel endpoint.
#[cfg(unix)]
pub fn default_endpoint() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tub.sock")
}

/// Platform default channel endpoint.
#[cfg(windows)]
pub fn default_endpoint() -> PathBuf {
    PathBuf::from(r"\\.\pipe\tub")
}
