//! The package service: registry ownership, reload, and request handling.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use quiver_bundle::{assemble, Bundle, ManifestEntry};
use quiver_common::{Namespace, VersionLabel};
use quiver_config::QuiverConfig;
use quiver_loader::{Ingested, LoadError, LoadReport, Loader, Transformer};
use quiver_markers::MarkerSet;
use quiver_registry::{PackageRecord, Registry, RegistryView};
use quiver_resolve::{resolve, ClientCacheState};

use crate::error::ServiceError;
use crate::request::{DeliveredPackage, ResolveRequest, ResolveResponse};

/// Owns the package registry and answers resolve requests against it.
///
/// The registry sits behind an `Arc` so [`reload`](Self::reload) can build
/// a replacement off to the side and swap it in whole. A request that
/// started before the swap finishes against the registry it started with.
pub struct PackageService {
    config: QuiverConfig,
    base_dir: PathBuf,
    markers: MarkerSet,
    transformer: Box<dyn Transformer>,
    registry: RwLock<Arc<Registry>>,
}

impl PackageService {
    /// Creates a service with an empty registry.
    ///
    /// Relative source roots in `config` are resolved against `base_dir`,
    /// normally the directory holding `quiver.toml`.
    pub fn new(
        config: QuiverConfig,
        base_dir: impl Into<PathBuf>,
        transformer: Box<dyn Transformer>,
    ) -> Result<Self, ServiceError> {
        let markers = config.markers.marker_set()?;
        Ok(Self {
            config,
            base_dir: base_dir.into(),
            markers,
            transformer,
            registry: RwLock::new(Arc::new(Registry::new())),
        })
    }

    /// Creates a service and loads its source roots.
    pub fn open(
        config: QuiverConfig,
        base_dir: impl Into<PathBuf>,
        transformer: Box<dyn Transformer>,
    ) -> Result<(Self, LoadReport), ServiceError> {
        let service = Self::new(config, base_dir, transformer)?;
        let report = service.reload()?;
        Ok((service, report))
    }

    /// Rebuilds the registry from the configured source roots and swaps it in.
    ///
    /// Packages whose source disappeared are gone afterwards. Individual
    /// unit failures are reported, not returned; only an unreadable root
    /// fails the reload, in which case the current registry is kept.
    pub fn reload(&self) -> Result<LoadReport, ServiceError> {
        let roots = self.roots();
        let fresh = Registry::new();
        let report = Loader::new(&fresh, &self.markers, self.transformer.as_ref())
            .load_tree(&roots, self.config.sources.versioning)?;

        let packages = fresh.len();
        *self.registry.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(fresh);
        tracing::info!(
            packages,
            failed = report.failures.len(),
            "registry reloaded"
        );
        Ok(report)
    }

    /// Ingests one source unit into the current registry.
    pub fn ingest(
        &self,
        raw: &str,
        source_path: &Path,
        version: Option<&VersionLabel>,
    ) -> Result<Ingested, LoadError> {
        let registry = self.registry();
        Loader::new(&registry, &self.markers, self.transformer.as_ref())
            .ingest(raw, source_path, version)
    }

    /// The current registry.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The service configuration.
    pub fn config(&self) -> &QuiverConfig {
        &self.config
    }

    /// The marker set built from the configuration.
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Source roots with relative paths resolved.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.config.sources.resolved_roots(&self.base_dir)
    }

    /// Resolves a request into a structured response.
    ///
    /// Code is returned as compiled, dependency markers included.
    pub fn resolve(&self, request: &ResolveRequest) -> ResolveResponse {
        let (_, _, records) = self.resolve_records(request);
        let packages: Vec<DeliveredPackage> = records
            .iter()
            .map(|r| DeliveredPackage {
                namespace: r.namespace().clone(),
                hash: r.content_hash(),
                code: r.compiled_code().to_string(),
            })
            .collect();
        let manifest = packages
            .iter()
            .map(|p| ManifestEntry {
                namespace: p.namespace.clone(),
                hash: p.hash,
            })
            .collect();
        ResolveResponse {
            namespace: request.namespace.clone(),
            version: request.version.clone(),
            packages,
            manifest,
        }
    }

    /// Resolves a request and assembles the result into a bundle.
    ///
    /// Imports of packages the client reports are kept in the code; with
    /// `bundle.implied_dependencies` the direct dependencies of those
    /// packages count as reported too.
    pub fn bundle(&self, request: &ResolveRequest) -> Bundle {
        let (view, client, records) = self.resolve_records(request);
        let filter_state = if self.config.bundle.implied_dependencies {
            client.with_implied_dependencies(&view)
        } else {
            client
        };
        let filter: HashSet<Namespace> = filter_state.namespaces().cloned().collect();
        assemble(&records, &self.markers, &filter, &self.config.bundle.options())
    }

    /// Serializes the full registry contents as pretty JSON.
    pub fn dump(&self) -> Result<String, ServiceError> {
        Ok(self.registry().dump().to_json()?)
    }

    fn resolve_records(
        &self,
        request: &ResolveRequest,
    ) -> (RegistryView, ClientCacheState, Vec<Arc<PackageRecord>>) {
        let view = self.registry().view(request.version.as_ref());
        let client = ClientCacheState::from_reported(&request.cache);
        let records = resolve(&view, request.namespace.as_str(), &client).into_sorted();
        tracing::debug!(
            namespace = %request.namespace,
            reported = client.len(),
            delivered = records.len(),
            "handled resolve request"
        );
        (view, client, records)
    }
}
