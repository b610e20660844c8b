//! Map packaging library for the Tub mod loader
//!
//! This library turns a map's metadata and scene into a single `.tub`
//! package:
//! - plans and builds the asset bundles a package needs
//! - frames them behind a length-prefixed JSON header
//! - replaces the package file atomically
//! - hands the result to a running game, or starts one
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
