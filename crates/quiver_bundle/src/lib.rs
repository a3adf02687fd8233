//! Bundle assembly: turns a resolved record set into one deliverable text.
//!
//! A bundle starts with a manifest line announcing every delivered
//! `namespace → hash` pair to the client runtime, continues with each
//! record's compiled code in namespace order, and ends with a trailer that
//! lets the runtime reconcile conflicting definitions. Before a record's
//! code is appended its dependency markers are pruned with
//! [`prune_imports`].

#![warn(missing_docs)]

pub mod assemble;
pub mod prune;

pub use assemble::{assemble, Bundle, BundleOptions, ManifestEntry, DEFAULT_RUNTIME};
pub use prune::{prune_imports, PruneMode};
