//! Error types for packaging operations.
//!
//! [`Error`] covers the whole export pipeline. Bundle materialization and
//! consumer hand-off have their own enums ([`BuildError`], [`ChannelError`])
//! because callers treat them differently: a build error aborts the export,
//! a channel error only switches the notifier to its launch fallback.

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
    time::Duration,
};
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for packaging operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required package configuration is missing or inconsistent.
    ///
    /// Raised before any bundle is built.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },

    /// A bundle could not be materialized; the whole package is abandoned.
    #[error("Failed to build bundle `{identifier}`: {source}")]
    Build {
        /// Plan identifier of the failed bundle
        identifier: String,
        /// Underlying build failure
        #[source]
        source: BuildError,
    },

    /// Filesystem operation failed on a specific path.
    #[error("Error {context} {}: {error}", path.display())]
    Fs {
        /// Operation that failed
        context: &'static str,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying IO error
        #[source]
        error: io::Error,
    },

    /// Package header declares a format revision this reader does not know.
    #[error("Unsupported package version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the header
        found: u32,
        /// Version this crate reads and writes
        expected: u32,
    },

    /// Package bytes do not follow the container framing.
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// Starting a new consumer process failed.
    #[error("Failed to launch consumer `{program}`: {error}")]
    Launch {
        /// Program that could not be started
        program: String,
        /// Underlying IO error
        #[source]
        error: io::Error,
    },

    /// IO errors without path context
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Shorthand for [`Error::Configuration`].
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Failure reported by a bundle source for a single bundle.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Prebuilt bundle file is absent.
    #[error("bundle file not found: {}", path.display())]
    Missing {
        /// Where the bundle was expected
        path: PathBuf,
    },

    /// Asset builder exited unsuccessfully.
    #[error("builder exited with {status}: {stderr}")]
    Failed {
        /// Exit status of the builder
        status: ExitStatus,
        /// Captured standard error
        stderr: String,
    },

    /// Asset builder did not finish in time and was killed.
    #[error("builder timed out after {} seconds", timeout.as_secs())]
    TimedOut {
        /// Configured build timeout
        timeout: Duration,
    },

    /// Asset builder could not be started.
    #[error("failed to run `{command}`: {error}")]
    Spawn {
        /// Program that failed to start
        command: String,
        /// Underlying IO error
        #[source]
        error: io::Error,
    },

    /// Source has no bundle with this identifier.
    #[error("unknown bundle")]
    Unknown,

    /// IO failure while reading bundle bytes.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failure to reach a live consumer over the local channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Nothing is listening at the endpoint.
    #[error("no consumer listening at {}: {error}", endpoint.display())]
    Unreachable {
        /// Socket or pipe endpoint
        endpoint: PathBuf,
        /// Connect error
        #[source]
        error: io::Error,
    },

    /// Consumer accepted the connection but the message could not be written.
    #[error("failed to deliver message to {}: {error}", endpoint.display())]
    Delivery {
        /// Socket or pipe endpoint
        endpoint: PathBuf,
        /// Write error
        #[source]
        error: io::Error,
    },

    /// Connect or write did not complete within the timeout.
    #[error("consumer at {} did not accept the message within {timeout:?}", endpoint.display())]
    TimedOut {
        /// Socket or pipe endpoint
        endpoint: PathBuf,
        /// Configured timeout
        timeout: Duration,
    },
}

/// Extension trait attaching path context to IO results.
pub trait ErrorExt<T> {
    /// Converts the IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Turns an empty `Option` into a generic error.
pub trait Context<T> {
    /// Returns [`Error::GenericError`] with `msg` when the value is absent.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
