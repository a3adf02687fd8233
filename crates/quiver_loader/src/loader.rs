//! Ingestion of source units into the registry.

use std::path::{Path, PathBuf};

use quiver_common::{ContentHash, Namespace, VersionLabel};
use quiver_markers::{extract_dependencies, find_declaration, MarkerSet};
use quiver_registry::{PackageRecord, Registry};
use rayon::prelude::*;

use crate::discover::{discover, SourceUnit};
use crate::error::LoadError;
use crate::transform::Transformer;

/// What happened to a source unit that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    /// A record was committed to the registry.
    Committed {
        /// The declared namespace.
        namespace: Namespace,
        /// Hash of the committed compiled code.
        content_hash: ContentHash,
        /// Whether an earlier record for the namespace was replaced.
        replaced: bool,
    },
    /// The unit has no declaration marker and was ignored.
    NotAPackage,
}

/// Summary of a tree load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Namespaces committed, in completion order.
    pub committed: Vec<Namespace>,
    /// Files without a declaration marker.
    pub not_packages: Vec<PathBuf>,
    /// Units that failed; their previous records, if any, are untouched.
    pub failures: Vec<LoadError>,
}

impl LoadReport {
    /// Returns `true` if every unit was either committed or not a package.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ingests raw source units into a [`Registry`].
///
/// The loader borrows the registry and its collaborators; it holds no state
/// of its own, so one loader can ingest from many threads at once.
pub struct Loader<'a> {
    registry: &'a Registry,
    markers: &'a MarkerSet,
    transformer: &'a dyn Transformer,
}

impl<'a> Loader<'a> {
    /// Creates a loader committing into `registry`.
    pub fn new(
        registry: &'a Registry,
        markers: &'a MarkerSet,
        transformer: &'a dyn Transformer,
    ) -> Self {
        Self {
            registry,
            markers,
            transformer,
        }
    }

    /// Ingests one source unit.
    ///
    /// A unit without a declaration marker is not a package and yields
    /// [`Ingested::NotAPackage`]. Otherwise the source is transformed,
    /// aliases in the output are normalized to the canonical import marker,
    /// and the resulting record replaces any earlier one for the namespace.
    /// A transform failure leaves the registry unchanged.
    pub fn ingest(
        &self,
        raw: &str,
        source_path: &Path,
        version: Option<&VersionLabel>,
    ) -> Result<Ingested, LoadError> {
        let Some(namespace) = find_declaration(raw, self.markers) else {
            return Ok(Ingested::NotAPackage);
        };

        let compiled = self
            .transformer
            .transform(raw)
            .map_err(|source| LoadError::Transform {
                path: source_path.to_path_buf(),
                namespace: namespace.clone(),
                source,
            })?;
        let compiled_code = self.markers.normalize(&compiled).into_owned();
        let dependencies = extract_dependencies(&compiled_code, self.markers);

        let record = PackageRecord::new(
            namespace.clone(),
            compiled_code,
            source_path,
            dependencies,
        );
        let content_hash = record.content_hash();
        tracing::debug!(
            %namespace,
            hash = %content_hash,
            deps = record.dependencies().len(),
            raw_len = raw.len(),
            compiled_len = record.compiled_code().len(),
            "compiled package"
        );
        let replaced = self.registry.put(version, record).is_some();

        Ok(Ingested::Committed {
            namespace,
            content_hash,
            replaced,
        })
    }

    /// Reads and ingests one source file.
    pub fn load_file(
        &self,
        path: &Path,
        version: Option<&VersionLabel>,
    ) -> Result<Ingested, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        self.ingest(&raw, path, version)
    }

    /// Discovers and ingests every source unit under the given roots.
    ///
    /// Units are ingested in parallel with no ordering between them. When two
    /// units declare the same namespace, whichever commits last wins. A unit
    /// that fails is logged and recorded in the report; it never stops the
    /// others. Only a failure to list a root aborts the load.
    pub fn load_tree(&self, roots: &[PathBuf], versioned: bool) -> Result<LoadReport, LoadError> {
        let mut units: Vec<SourceUnit> = Vec::new();
        for root in roots {
            units.extend(discover(root, versioned)?);
        }

        let outcomes: Vec<(PathBuf, Result<Ingested, LoadError>)> = units
            .into_par_iter()
            .map(|unit| {
                let outcome = self.load_file(&unit.path, unit.version.as_ref());
                (unit.path, outcome)
            })
            .collect();

        let mut report = LoadReport::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(Ingested::Committed { namespace, .. }) => report.committed.push(namespace),
                Ok(Ingested::NotAPackage) => report.not_packages.push(path),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipped source unit");
                    report.failures.push(err);
                }
            }
        }
        tracing::info!(
            committed = report.committed.len(),
            ignored = report.not_packages.len(),
            failed = report.failures.len(),
            "loaded source tree"
        );
        Ok(report)
    }
}
