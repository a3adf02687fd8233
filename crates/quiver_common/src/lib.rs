//! Shared foundational types used across the Quiver package cache.
//!
//! This crate provides package namespaces, version labels, and the content
//! hash used as a client-visible fingerprint for compiled code.

#![warn(missing_docs)]

pub mod hash;
pub mod namespace;

pub use hash::{ContentHash, ParseHashError};
pub use namespace::{Namespace, NamespaceError, VersionLabel};
