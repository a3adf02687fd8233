//! Ingestion of raw source units into the package registry.
//!
//! The [`Loader`] turns one source unit into a committed
//! [`PackageRecord`](quiver_registry::PackageRecord): it detects the package
//! declaration, runs the [`Transformer`], hashes the result, extracts
//! dependencies, and replaces the namespace's registry entry. Source trees are
//! discovered with [`discover`] and ingested in parallel by
//! [`Loader::load_tree`].

#![warn(missing_docs)]

pub mod discover;
pub mod error;
pub mod loader;
pub mod transform;

pub use discover::{discover, SourceUnit};
pub use error::{LoadError, TransformError};
pub use loader::{Ingested, LoadReport, Loader};
pub use transform::{Transformer, Verbatim};
