//! Error types for the packager binary.
//!
//! Library failures arrive wrapped in [`BundlerError::Bundler`]; everything
//! the CLI and manifest loader add on top lives in [`CliError`].

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the packager binary
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument and manifest errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest parsing errors
    #[error("Manifest error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Export pipeline errors
    #[error("Export error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Errors carrying added context
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments or manifest values
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Conflicting arguments
    #[error("Conflicting arguments: {arguments:?}")]
    ConflictingArguments {
        /// Arguments that conflict
        arguments: Vec<String>,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Hints printed under the error message.
    ///
    /// Errors wrapped with context are matched by their underlying cause.
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Toml(_) => toml_suggestions(),
            BundlerError::Bundler(error) => bundler_suggestions(error),
            BundlerError::Anyhow(error) => error
                .chain()
                .find_map(|cause| {
                    if let Some(inner) = cause.downcast_ref::<BundlerError>() {
                        Some(inner.recovery_suggestions())
                    } else if let Some(inner) = cause.downcast_ref::<crate::bundler::Error>() {
                        Some(bundler_suggestions(inner))
                    } else {
                        cause.downcast_ref::<toml::de::Error>().map(|_| toml_suggestions())
                    }
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

fn toml_suggestions() -> Vec<String> {
    vec!["Check the manifest against the documented keys".to_string()]
}

fn bundler_suggestions(error: &crate::bundler::Error) -> Vec<String> {
    use crate::bundler::{BuildError, Error};

    match error {
        Error::Configuration { .. } => {
            vec!["Check the [package] and [export] sections of the manifest".to_string()]
        }
        Error::Build {
            source: BuildError::Missing { .. },
            ..
        } => vec!["Run the asset builder before exporting, or use a command source".to_string()],
        Error::Build {
            source: BuildError::TimedOut { .. },
            ..
        } => vec!["Raise source.timeout_secs in the manifest".to_string()],
        Error::Launch { .. } => vec!["Check consumer.program in the manifest".to_string()],
        Error::UnsupportedVersion { .. } | Error::MalformedPackage(_) => {
            vec!["Re-export the package with this version of tub_packager".to_string()]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BuildError, Error};
    use std::path::PathBuf;

    #[test]
    fn missing_bundle_suggests_running_builder() {
        let err = BundlerError::from(Error::Build {
            identifier: "harbor.meta".into(),
            source: BuildError::Missing {
                path: PathBuf::from("TempBundleBuild/harbor.meta"),
            },
        });
        assert_eq!(err.recovery_suggestions().len(), 1);
    }

    #[test]
    fn context_wrapped_errors_keep_their_suggestions() {
        use anyhow::Context;

        let manifest: std::result::Result<(), BundlerError> =
            Err(Error::configuration("missing metadata reference").into());
        let err = BundlerError::from(
            manifest.context("Failed to load manifest harbor.toml").unwrap_err(),
        );
        assert_eq!(
            err.recovery_suggestions(),
            ["Check the [package] and [export] sections of the manifest"]
        );

        let inspected: std::result::Result<(), Error> =
            Err(Error::MalformedPackage("truncated header length prefix".into()));
        let err = BundlerError::from(inspected.context("Failed to inspect a.tub").unwrap_err());
        assert_eq!(err.recovery_suggestions().len(), 1);
    }

    #[test]
    fn cli_errors_have_no_suggestions() {
        let err = BundlerError::from(CliError::MissingArgument {
            argument: "--manifest".into(),
        });
        assert!(err.recovery_suggestions().is_empty());
        assert_eq!(err.to_string(), "CLI error: Missing required argument: --manifest");
    }
}
