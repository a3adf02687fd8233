//! Serializable full-contents dump of the registry.

use quiver_common::VersionLabel;
use serde::Serialize;

use crate::record::PackageRecord;

/// Owned copy of every record in a [`Registry`](crate::Registry), for
/// operator diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryDump {
    /// One entry per version scope, unversioned scope first.
    pub scopes: Vec<ScopeDump>,
}

/// The records of a single version scope.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeDump {
    /// The scope's version label, or `None` for the unversioned scope.
    pub version: Option<VersionLabel>,
    /// Records sorted by namespace.
    pub packages: Vec<PackageRecord>,
}

impl RegistryDump {
    /// Total number of records in the dump.
    pub fn package_count(&self) -> usize {
        self.scopes.iter().map(|s| s.packages.len()).sum()
    }

    /// Serializes the dump as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
