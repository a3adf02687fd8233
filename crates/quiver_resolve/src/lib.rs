//! Incremental dependency resolution against a client's cache state.
//!
//! Given an entry-point namespace and the `namespace → hash` pairs a client
//! reports holding, [`resolve`] walks the dependency graph in a
//! [`RegistryView`](quiver_registry::RegistryView) and returns exactly the
//! records the client is missing or holds stale copies of.

#![warn(missing_docs)]

pub mod client;
pub mod resolver;

pub use client::ClientCacheState;
pub use resolver::{resolve, Resolution};
