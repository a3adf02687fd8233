//! Error types for the package service.

use quiver_loader::LoadError;
use quiver_markers::MarkerError;

/// Errors raised by [`PackageService`](crate::PackageService) and request parsing.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The configured marker names do not form a valid marker set.
    #[error("invalid marker configuration: {0}")]
    Markers(#[from] MarkerError),

    /// A source root could not be listed during (re)loading.
    #[error("failed to load sources: {0}")]
    Load(#[from] LoadError),

    /// A request path does not name a package.
    #[error("invalid request path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The registry dump could not be serialized.
    #[error("failed to serialize registry dump: {0}")]
    Dump(#[from] serde_json::Error),
}
