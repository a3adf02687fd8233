//! Immutable compiled package records.

use std::path::{Path, PathBuf};

use quiver_common::{ContentHash, Namespace};
use serde::Serialize;

/// The compiled form of one package.
///
/// Records are never mutated. Re-ingesting a namespace builds a new record
/// and replaces the old one wholesale. The content hash is always computed
/// from the compiled code here, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    namespace: Namespace,
    content_hash: ContentHash,
    source_path: PathBuf,
    dependencies: Vec<Namespace>,
    compiled_code: String,
}

impl PackageRecord {
    /// Builds a record, hashing `compiled_code` and dropping any dependency
    /// on the package itself.
    pub fn new(
        namespace: Namespace,
        compiled_code: String,
        source_path: impl Into<PathBuf>,
        mut dependencies: Vec<Namespace>,
    ) -> Self {
        dependencies.retain(|dep| *dep != namespace);
        Self {
            content_hash: ContentHash::of(&compiled_code),
            namespace,
            source_path: source_path.into(),
            dependencies,
            compiled_code,
        }
    }

    /// The namespace this record defines.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The deliverable compiled code.
    pub fn compiled_code(&self) -> &str {
        &self.compiled_code
    }

    /// Fingerprint of the compiled code.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Path of the source unit this record was built from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Declared dependencies in source order. May contain duplicates, never
    /// the record's own namespace.
    pub fn dependencies(&self) -> &[Namespace] {
        &self.dependencies
    }
}
