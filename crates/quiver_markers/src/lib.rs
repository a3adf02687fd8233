//! Declaration and dependency markers embedded in package source.
//!
//! A package announces itself with `Declare("<namespace>")` and pulls in
//! other packages with `Import("<namespace>")`. This crate owns the marker
//! configuration (canonical names plus legacy aliases), a scanner that turns
//! source text into typed marker tokens, and the dependency extractor built
//! on top of it.

#![warn(missing_docs)]

pub mod extract;
pub mod markers;
pub mod scanner;
pub mod token;

pub use extract::{extract_dependencies, find_declaration};
pub use markers::{MarkerError, MarkerSet};
pub use scanner::{scan, scan_imports};
pub use token::{Marker, MarkerKind, Span, Token};
