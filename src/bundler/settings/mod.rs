//! Configuration structures for export operations.
//!
//! This module provides the package descriptor, named bundle definitions,
//! bundle source selection, consumer hand-off settings and the builder that
//! assembles them into [`Settings`].

mod builder;
mod bundle;
mod consumer;
mod core;
mod package;
mod source;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use bundle::NamedBundle;
pub use consumer::{ConsumerSettings, DEFAULT_NOTIFY_TIMEOUT, LauncherSettings, default_endpoint};
pub use self::core::Settings;
pub use package::PackageDescriptor;
pub use source::{DEFAULT_BUILD_TIMEOUT, SourceSettings};
