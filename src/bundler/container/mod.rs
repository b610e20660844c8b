//! Package container format.
//!
//! A package file is laid out as:
//!
//! ```text
//! [varint: header text length]
//! [header text: {"Version":1,"Meta":{"Size":N},"Scenes":[{"Size":M},...]}]
//! [N bytes: metadata bundle]
//! [M bytes: first scene bundle]
//! ...
//! ```
//!
//! There is no padding and no trailer; the declared sizes account for every
//! byte after the header.
//!
//! - [`assembler`] - materializes a plan and frames it
//! - [`header`] - header record and length-prefixed encoding
//! - [`reader`] - parses and validates package files
//! - [`varint`] - 7-bit length prefix

pub mod assembler;
pub mod header;
pub mod reader;
pub mod varint;

pub use assembler::{AssembledPackage, BundleReport, assemble};
pub use header::{BundleSection, HEADER_VERSION, PackageHeader};
pub use reader::PackageContents;
