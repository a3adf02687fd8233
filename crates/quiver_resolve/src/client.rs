//! The client's reported cache state.

use std::collections::HashMap;

use quiver_common::{ContentHash, Namespace};
use quiver_registry::RegistryView;

/// The `namespace → content hash` pairs a client reports holding.
///
/// Reported state may be empty, partial, or stale; it is only ever compared
/// against the registry, never trusted as a description of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCacheState {
    entries: HashMap<Namespace, ContentHash>,
}

impl ClientCacheState {
    /// Creates an empty state, as reported by a client with a cold cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from raw client-supplied strings.
    ///
    /// Pairs whose namespace or hash does not parse are dropped. The client
    /// then simply receives that package again, which is always safe.
    pub fn from_reported<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .filter_map(|(ns, hash)| {
                let (ns, hash) = (ns.as_ref(), hash.as_ref());
                match (Namespace::new(ns), hash.parse::<ContentHash>()) {
                    (Ok(ns), Ok(hash)) => Some((ns, hash)),
                    _ => {
                        tracing::debug!(namespace = ns, hash, "ignoring malformed cache entry");
                        None
                    }
                }
            })
            .collect()
    }

    /// Records that the client holds `hash` for `namespace`, returning the
    /// previously reported hash.
    pub fn insert(&mut self, namespace: Namespace, hash: ContentHash) -> Option<ContentHash> {
        self.entries.insert(namespace, hash)
    }

    /// The hash the client reports for a namespace.
    pub fn get(&self, namespace: &str) -> Option<ContentHash> {
        self.entries.get(namespace).copied()
    }

    /// Returns `true` if the client reports exactly `hash` for `namespace`.
    pub fn holds(&self, namespace: &str, hash: ContentHash) -> bool {
        self.get(namespace) == Some(hash)
    }

    /// Returns `true` if the client reports any hash for `namespace`.
    pub fn contains(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    /// Number of reported entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the client reports nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the reported namespaces in unspecified order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.entries.keys()
    }

    /// Extends the state with the direct dependencies of every reported
    /// package that the view knows, at the view's current hash.
    ///
    /// A client holding a package also holds what that package imports, so
    /// those imports may stay in delivered code for the client to resolve.
    /// Explicitly reported pairs are never overwritten.
    pub fn with_implied_dependencies(&self, view: &RegistryView) -> Self {
        let mut implied = self.clone();
        for ns in self.entries.keys() {
            let Some(record) = view.get(ns.as_str()) else {
                continue;
            };
            for dep in record.dependencies() {
                if implied.contains(dep.as_str()) {
                    continue;
                }
                if let Some(dep_record) = view.get(dep.as_str()) {
                    implied.insert(dep.clone(), dep_record.content_hash());
                }
            }
        }
        implied
    }
}

impl FromIterator<(Namespace, ContentHash)> for ClientCacheState {
    fn from_iter<T: IntoIterator<Item = (Namespace, ContentHash)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
