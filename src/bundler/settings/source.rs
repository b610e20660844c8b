//! Bundle source selection.

use std::{path::PathBuf, time::Duration};

/// Default time allowed for a single external bundle build (10 minutes).
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(600);

/// Where bundle bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    /// The asset builder already wrote `<dir>/<identifier>` for every bundle.
    Directory(PathBuf),

    /// Run an asset builder once per bundle and read the bundle from stdout.
    Command {
        /// Builder program
        program: PathBuf,
        /// Leading arguments, before the identifier and asset paths
        args: Vec<String>,
        /// Per-bundle timeout
        timeout: Duration,
    },
}
