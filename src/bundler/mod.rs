//! Map package bundling.
//!
//! The export pipeline, leaf to root:
//!
//! - [`source`] - bundle sources that turn identifiers into bytes
//! - [`plan`] - which bundles a package needs, in assembly order
//! - [`container`] - header framing, assembly and parsing of `.tub` files
//! - [`utils::fs`] - atomic replacement of the package file
//! - [`notify`] - hand-off to a running game, or launching one
//! - [`builder`] - the [`Packager`] tying the steps together
//!
//! Configuration lives in [`settings`].

pub mod builder;
pub mod container;
pub mod error;
pub mod notify;
pub mod plan;
pub mod settings;
pub mod source;
pub mod utils;

pub use builder::{ExportedPackage, Packager};
pub use container::{
    AssembledPackage, BundleReport, BundleSection, HEADER_VERSION, PackageContents, PackageHeader,
};
pub use error::{BuildError, ChannelError, Error, ErrorExt, Result};
pub use notify::{Notifier, NotifyOutcome, RunDirective};
pub use plan::{BundleKind, BundlePlan, PlanEntry};
pub use settings::*;
pub use source::{
    BundleSource, CommandBundleSource, ConfiguredSource, DirectoryBundleSource, MemoryBundleSource,
};
