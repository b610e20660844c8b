//! Export orchestration and coordination.
//!
//! This module provides the main [`Packager`] orchestrator that turns a
//! package descriptor into a `.tub` file.
//!
//! # Overview
//!
//! The packager:
//! 1. Reads configuration from [`Settings`](crate::bundler::Settings)
//! 2. Plans the bundles (named bundles, then meta, then scene)
//! 3. Materializes them through a bundle source
//! 4. Frames the header and sections and writes the file atomically
//! 5. Returns an [`ExportedPackage`] with size and checksum
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for packages
//! - [`orchestrator`] - Main [`Packager`] struct and export operations

pub mod checksum;
mod orchestrator;

pub use orchestrator::{ExportedPackage, Packager};
