//! Bundle text and manifest construction.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;

use quiver_common::{ContentHash, Namespace};
use quiver_markers::MarkerSet;
use quiver_registry::PackageRecord;
use serde::{Deserialize, Serialize};

use crate::prune::{prune_imports, PruneMode};

/// Name of the client runtime object the bundle header and trailer call.
pub const DEFAULT_RUNTIME: &str = "Cache";

/// Knobs for [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Client runtime object receiving `addFromLib` and `fixConflicts`.
    pub runtime: String,
    /// Which dependency markers to remove from delivered code.
    pub prune: PruneMode,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            prune: PruneMode::default(),
        }
    }
}

/// One delivered package as announced to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Namespace of the delivered package.
    pub namespace: Namespace,
    /// Content hash the client should record for it.
    pub hash: ContentHash,
}

/// The deliverable artifact for one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Header, pruned code of each package, and trailer.
    pub text: String,
    /// Delivered packages in bundle order.
    pub manifest: Vec<ManifestEntry>,
}

impl Bundle {
    /// Returns `true` if the bundle delivers no package.
    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }
}

/// Assembles resolved records into a bundle.
///
/// Records are emitted sorted by namespace whatever order they arrive in.
/// `filter` is the manifest-filter set: imports of these namespaces are
/// left in the code under [`PruneMode::OutsideFilter`].
pub fn assemble(
    records: &[Arc<PackageRecord>],
    markers: &MarkerSet,
    filter: &HashSet<Namespace>,
    options: &BundleOptions,
) -> Bundle {
    let mut sorted: Vec<&PackageRecord> = records.iter().map(|r| r.as_ref()).collect();
    sorted.sort_by(|a, b| a.namespace().cmp(b.namespace()));

    let manifest: Vec<ManifestEntry> = sorted
        .iter()
        .map(|r| ManifestEntry {
            namespace: r.namespace().clone(),
            hash: r.content_hash(),
        })
        .collect();

    let code_len: usize = sorted.iter().map(|r| r.compiled_code().len()).sum();
    let mut text = String::with_capacity(code_len + 64 * manifest.len() + 64);
    write_header(&mut text, &options.runtime, &manifest);
    for record in &sorted {
        text.push_str(&prune_imports(
            record.compiled_code(),
            markers,
            filter,
            options.prune,
        ));
    }
    let _ = write!(text, ";{}.fixConflicts();", options.runtime);

    tracing::debug!(
        packages = manifest.len(),
        bytes = text.len(),
        prune = ?options.prune,
        "assembled bundle"
    );
    Bundle { text, manifest }
}

/// Writes `<runtime>.addFromLib([['ns','hash'],...]);`.
fn write_header(out: &mut String, runtime: &str, manifest: &[ManifestEntry]) {
    let _ = write!(out, "{runtime}.addFromLib([");
    for (i, entry) in manifest.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "['{}','{}']", entry.namespace, entry.hash);
    }
    out.push_str("]);");
}
