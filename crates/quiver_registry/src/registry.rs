//! The versioned package registry and its read snapshots.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quiver_common::{Namespace, VersionLabel};

use crate::dump::{RegistryDump, ScopeDump};
use crate::record::PackageRecord;

/// One version scope: namespace to shared record.
type Scope = HashMap<Namespace, Arc<PackageRecord>>;

/// Registry of compiled packages, partitioned by optional version label.
///
/// Each scope map sits behind an `Arc` and is replaced copy-on-write, so a
/// [`RegistryView`] taken before a write keeps seeing the records it started
/// with while new readers see the replacement. Writes are atomic per
/// namespace: a reader observes either the prior record or the new one.
#[derive(Debug, Default)]
pub struct Registry {
    scopes: RwLock<HashMap<Option<VersionLabel>, Arc<Scope>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a record under its namespace, replacing any previous record.
    ///
    /// Returns the replaced record, if there was one.
    pub fn put(
        &self,
        version: Option<&VersionLabel>,
        record: PackageRecord,
    ) -> Option<Arc<PackageRecord>> {
        let namespace = record.namespace().clone();
        let mut scopes = self.write();
        let scope = scopes.entry(version.cloned()).or_default();
        let previous = Arc::make_mut(scope).insert(namespace.clone(), Arc::new(record));
        match &previous {
            Some(old) => tracing::debug!(
                %namespace,
                version = ?version.map(VersionLabel::as_str),
                replaced = %old.source_path().display(),
                "replaced package record"
            ),
            None => tracing::debug!(
                %namespace,
                version = ?version.map(VersionLabel::as_str),
                "registered package record"
            ),
        }
        previous
    }

    /// Looks up the current record for a namespace.
    pub fn get(
        &self,
        version: Option<&VersionLabel>,
        namespace: &str,
    ) -> Option<Arc<PackageRecord>> {
        let scopes = self.read();
        scopes
            .get(&version.cloned())
            .and_then(|scope| scope.get(namespace))
            .cloned()
    }

    /// Returns every version label that has at least one scope, sorted.
    ///
    /// The unversioned scope is not a label and is never listed.
    pub fn list_versions(&self) -> Vec<VersionLabel> {
        let mut versions: Vec<VersionLabel> = self.read().keys().flatten().cloned().collect();
        versions.sort();
        versions
    }

    /// Takes a consistent snapshot of one version scope.
    ///
    /// A missing scope yields an empty view.
    pub fn view(&self, version: Option<&VersionLabel>) -> RegistryView {
        let scope = self
            .read()
            .get(&version.cloned())
            .cloned()
            .unwrap_or_default();
        RegistryView {
            version: version.cloned(),
            scope,
        }
    }

    /// Total number of records across all scopes.
    pub fn len(&self) -> usize {
        self.read().values().map(|scope| scope.len()).sum()
    }

    /// Returns `true` if no record has been committed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies out the full registry contents for diagnostics.
    ///
    /// Scopes are ordered with the unversioned scope first, then by label;
    /// packages within a scope are ordered by namespace.
    pub fn dump(&self) -> RegistryDump {
        let scopes = self.read();
        let mut dumped: Vec<ScopeDump> = scopes
            .iter()
            .map(|(version, scope)| {
                let mut packages: Vec<PackageRecord> =
                    scope.values().map(|record| (**record).clone()).collect();
                packages.sort_by(|a, b| a.namespace().cmp(b.namespace()));
                ScopeDump {
                    version: version.clone(),
                    packages,
                }
            })
            .collect();
        dumped.sort_by(|a, b| a.version.cmp(&b.version));
        RegistryDump { scopes: dumped }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Option<VersionLabel>, Arc<Scope>>> {
        self.scopes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Option<VersionLabel>, Arc<Scope>>> {
        self.scopes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An immutable snapshot of one registry scope.
///
/// Cheap to clone. Later writes to the registry are not visible through an
/// existing view.
#[derive(Debug, Clone, Default)]
pub struct RegistryView {
    version: Option<VersionLabel>,
    scope: Arc<Scope>,
}

impl RegistryView {
    /// The version label this view was taken for.
    pub fn version(&self) -> Option<&VersionLabel> {
        self.version.as_ref()
    }

    /// Looks up a record by namespace.
    pub fn get(&self, namespace: &str) -> Option<&Arc<PackageRecord>> {
        self.scope.get(namespace)
    }

    /// Returns `true` if the namespace has a record in this view.
    pub fn contains(&self, namespace: &str) -> bool {
        self.scope.contains_key(namespace)
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.scope.len()
    }

    /// Returns `true` if the view holds no records.
    pub fn is_empty(&self) -> bool {
        self.scope.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_common::ContentHash;
    use std::thread;

    fn ns(s: &str) -> Namespace {
        Namespace::new(s).unwrap()
    }

    fn record(name: &str, code: &str) -> PackageRecord {
        PackageRecord::new(ns(name), code.to_string(), format!("{name}.js"), vec![])
    }

    fn v(label: &str) -> VersionLabel {
        VersionLabel::new(label).unwrap()
    }

    #[test]
    fn empty_registry() {
        let reg = Registry::new();
        assert!(reg.is_empty());
        assert!(reg.get(None, "a").is_none());
        assert!(reg.list_versions().is_empty());
        assert!(reg.view(None).is_empty());
    }

    #[test]
    fn put_then_get() {
        let reg = Registry::new();
        assert!(reg.put(None, record("a", "one")).is_none());
        let got = reg.get(None, "a").unwrap();
        assert_eq!(got.compiled_code(), "one");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn put_replaces_whole_record() {
        let reg = Registry::new();
        reg.put(None, record("a", "one"));
        let previous = reg.put(None, record("a", "two")).unwrap();
        assert_eq!(previous.compiled_code(), "one");
        assert_eq!(reg.get(None, "a").unwrap().compiled_code(), "two");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn scopes_are_separate() {
        let reg = Registry::new();
        reg.put(Some(&v("1.0")), record("a", "old"));
        reg.put(Some(&v("2.0")), record("a", "new"));
        assert_eq!(reg.get(Some(&v("1.0")), "a").unwrap().compiled_code(), "old");
        assert_eq!(reg.get(Some(&v("2.0")), "a").unwrap().compiled_code(), "new");
        assert!(reg.get(None, "a").is_none());
        assert_eq!(reg.list_versions(), vec![v("1.0"), v("2.0")]);
    }

    #[test]
    fn unversioned_scope_not_listed() {
        let reg = Registry::new();
        reg.put(None, record("a", "x"));
        assert!(reg.list_versions().is_empty());
    }

    #[test]
    fn view_is_a_snapshot() {
        let reg = Registry::new();
        reg.put(None, record("a", "one"));
        let view = reg.view(None);
        reg.put(None, record("a", "two"));
        reg.put(None, record("b", "new"));
        assert_eq!(view.get("a").unwrap().compiled_code(), "one");
        assert!(!view.contains("b"));
        assert_eq!(reg.view(None).get("a").unwrap().compiled_code(), "two");
    }

    #[test]
    fn view_of_missing_scope_is_empty() {
        let reg = Registry::new();
        reg.put(None, record("a", "x"));
        let view = reg.view(Some(&v("9")));
        assert!(view.is_empty());
        assert_eq!(view.version(), Some(&v("9")));
    }

    #[test]
    fn dump_is_sorted() {
        let reg = Registry::new();
        reg.put(Some(&v("b")), record("z", "1"));
        reg.put(None, record("m", "2"));
        reg.put(None, record("c", "3"));
        let dump = reg.dump();
        assert_eq!(dump.scopes.len(), 2);
        assert!(dump.scopes[0].version.is_none());
        let names: Vec<&str> = dump.scopes[0]
            .packages
            .iter()
            .map(|p| p.namespace().as_str())
            .collect();
        assert_eq!(names, vec!["c", "m"]);
        assert_eq!(dump.scopes[1].version, Some(v("b")));
        assert_eq!(dump.package_count(), 3);
    }

    #[test]
    fn concurrent_readers_never_see_torn_records() {
        let reg = Arc::new(Registry::new());
        reg.put(None, record("a", "v0"));

        let writer = {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                for i in 1..200 {
                    reg.put(None, record("a", &format!("v{i}")));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reg = Arc::clone(&reg);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let r = reg.get(None, "a").unwrap();
                        assert_eq!(r.content_hash(), ContentHash::of(r.compiled_code()));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for h in readers {
            h.join().unwrap();
        }
        assert_eq!(reg.get(None, "a").unwrap().compiled_code(), "v199");
    }
}
