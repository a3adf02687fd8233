//! Error types for configuration loading and validation.

use std::path::PathBuf;

use quiver_markers::MarkerError;

/// Errors raised while loading or validating `quiver.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required setting is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The marker names do not form a usable marker set.
    #[error("invalid markers: {0}")]
    Markers(#[from] MarkerError),

    /// A setting is present but unusable.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted name of the setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
