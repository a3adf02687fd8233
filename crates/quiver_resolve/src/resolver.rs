//! Depth-first resolution of the records a client is missing.
//!
//! The walk starts at the requested namespace and visits each namespace at
//! most once per resolution:
//!
//! 1. A namespace already visited is skipped. This is what makes cycles and
//!    shared sub-dependencies safe.
//! 2. A namespace absent from the registry contributes nothing. Unknown
//!    names are never an error.
//! 3. A record whose hash the client already reports is neither delivered
//!    nor descended into: the client is assumed to hold its whole subtree
//!    from an earlier delivery.
//! 4. Any other record is delivered, in first-discovery pre-order, and its
//!    dependencies are visited in declared order.
//!
//! The visited set and the output list are explicit locals of each call, so
//! concurrent resolutions share nothing but the read-only view.

use std::collections::HashSet;
use std::sync::Arc;

use quiver_registry::{PackageRecord, RegistryView};

use crate::client::ClientCacheState;

/// The records one resolution decided to deliver.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    records: Vec<Arc<PackageRecord>>,
}

impl Resolution {
    /// Records in first-discovery (pre-order) order.
    pub fn records(&self) -> &[Arc<PackageRecord>] {
        &self.records
    }

    /// Number of records to deliver.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the client already has everything it needs.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the resolution, returning records sorted by namespace.
    ///
    /// Two resolutions that reach the same record set produce the same
    /// sorted sequence regardless of discovery order.
    pub fn into_sorted(self) -> Vec<Arc<PackageRecord>> {
        let mut records = self.records;
        records.sort_by(|a, b| a.namespace().cmp(b.namespace()));
        records
    }
}

/// Computes the records a client needs to run `requested`.
///
/// Runs in time linear in the reachable part of the graph and terminates on
/// cyclic graphs.
pub fn resolve(view: &RegistryView, requested: &str, client: &ClientCacheState) -> Resolution {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut records = Vec::new();
    walk(view, requested, client, &mut visited, &mut records);

    tracing::debug!(
        requested,
        version = ?view.version().map(|v| v.as_str()),
        visited = visited.len(),
        delivered = records.len(),
        "resolved package graph"
    );
    Resolution { records }
}

/// Pre-order depth-first walk with an explicit stack.
///
/// Dependencies are pushed in reverse so they pop in declared order, which
/// yields the same visiting order as the recursive formulation without
/// bounding graph depth by the call stack.
fn walk<'v>(
    view: &'v RegistryView,
    start: &'v str,
    client: &ClientCacheState,
    visited: &mut HashSet<&'v str>,
    out: &mut Vec<Arc<PackageRecord>>,
) {
    let mut stack: Vec<&'v str> = vec![start];
    while let Some(namespace) = stack.pop() {
        if !visited.insert(namespace) {
            continue;
        }
        let Some(record) = view.get(namespace) else {
            continue;
        };
        if client.holds(namespace, record.content_hash()) {
            continue;
        }
        out.push(Arc::clone(record));
        stack.extend(record.dependencies().iter().rev().map(|dep| dep.as_str()));
    }
}
