//! Configuration types deserialized from `quiver.toml`.

use std::path::{Path, PathBuf};

use quiver_bundle::{BundleOptions, PruneMode, DEFAULT_RUNTIME};
use quiver_markers::{MarkerError, MarkerSet};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `quiver.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuiverConfig {
    /// Where package sources are loaded from.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Declaration and dependency marker names.
    #[serde(default)]
    pub markers: MarkersConfig,
    /// Bundle assembly settings.
    #[serde(default)]
    pub bundle: BundleConfig,
}

impl QuiverConfig {
    /// A configuration loading from `roots` with every other setting at its default.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            sources: SourcesConfig {
                roots,
                ..SourcesConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Source tree locations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    /// Directories walked for package source units. Relative paths are
    /// resolved against the directory holding the configuration file.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Treat each first-level subdirectory of a root as a version label.
    #[serde(default)]
    pub versioning: bool,
}

impl SourcesConfig {
    /// Returns the roots with relative paths joined onto `base`.
    pub fn resolved_roots(&self, base: &Path) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| {
                if root.is_absolute() {
                    root.clone()
                } else {
                    base.join(root)
                }
            })
            .collect()
    }
}

/// Marker names recognized in package source.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkersConfig {
    /// Name of the package-declaration marker.
    #[serde(default = "default_declare")]
    pub declare: String,
    /// Name of the canonical dependency marker.
    #[serde(default = "default_import")]
    pub import: String,
    /// Legacy names rewritten to the dependency marker before scanning.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub aliases: Vec<String>,
}

impl MarkersConfig {
    /// Builds the validated marker set these names describe.
    pub fn marker_set(&self) -> Result<MarkerSet, MarkerError> {
        MarkerSet::new(&self.declare, &self.import, self.aliases.clone())
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            declare: default_declare(),
            import: default_import(),
            aliases: Vec::new(),
        }
    }
}

fn default_declare() -> String {
    quiver_markers::markers::DEFAULT_DECLARE.to_string()
}

fn default_import() -> String {
    quiver_markers::markers::DEFAULT_IMPORT.to_string()
}

/// Bundle assembly settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfig {
    /// Client runtime object called by the bundle header and trailer.
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Which dependency markers are removed from delivered code.
    #[serde(default)]
    pub prune: PruneMode,
    /// Treat the direct dependencies of reported packages as reported too
    /// when deciding which imports survive pruning.
    #[serde(default = "default_true")]
    pub implied_dependencies: bool,
}

impl BundleConfig {
    /// Assembly options for these settings.
    pub fn options(&self) -> BundleOptions {
        BundleOptions {
            runtime: self.runtime.clone(),
            prune: self.prune,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            prune: PruneMode::default(),
            implied_dependencies: true,
        }
    }
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME.to_string()
}

fn default_true() -> bool {
    true
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `aliases = "require"` (string) and
/// `aliases = ["require", "JSE.include"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
