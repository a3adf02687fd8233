//! In-memory package registry.
//!
//! Holds one immutable [`PackageRecord`] per namespace, partitioned by an
//! optional [`VersionLabel`](quiver_common::VersionLabel). Writers replace a
//! namespace's record atomically; readers take cheap [`RegistryView`]
//! snapshots that stay consistent for the length of a resolution.

#![warn(missing_docs)]

pub mod dump;
pub mod record;
pub mod registry;

pub use dump::{RegistryDump, ScopeDump};
pub use record::PackageRecord;
pub use registry::{Registry, RegistryView};
