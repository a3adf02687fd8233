//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::QuiverConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE: &str = "quiver.toml";

/// Loads and validates a `quiver.toml` configuration from a project directory.
///
/// Reads `<project_dir>/quiver.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<QuiverConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<QuiverConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `quiver.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<QuiverConfig, ConfigError> {
    let config: QuiverConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
pub fn validate_config(config: &QuiverConfig) -> Result<(), ConfigError> {
    if config.sources.roots.is_empty() {
        return Err(ConfigError::MissingField("sources.roots"));
    }
    if config.markers.declare.is_empty() {
        return Err(ConfigError::MissingField("markers.declare"));
    }
    if config.markers.import.is_empty() {
        return Err(ConfigError::MissingField("markers.import"));
    }
    config.markers.marker_set()?;
    if config.bundle.runtime.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "bundle.runtime",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_bundle::PruneMode;
    use std::path::PathBuf;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[sources]
roots = ["src"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sources.roots, vec![PathBuf::from("src")]);
        assert!(!config.sources.versioning);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[sources]
roots = ["src", "vendor/lib"]
versioning = true

[markers]
declare = "JSEPackage"
import = "JSEImport"
aliases = ["require", "JSE.include"]

[bundle]
runtime = "JSE.Cache"
prune = "strip-all"
implied_dependencies = false
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sources.roots.len(), 2);
        assert!(config.sources.versioning);
        assert_eq!(config.markers.declare, "JSEPackage");
        assert_eq!(config.markers.import, "JSEImport");
        assert_eq!(config.markers.aliases.len(), 2);
        assert_eq!(config.bundle.runtime, "JSE.Cache");
        assert_eq!(config.bundle.prune, PruneMode::StripAll);
        assert!(!config.bundle.implied_dependencies);
    }

    #[test]
    fn default_values() {
        let config = load_config_from_str("[sources]\nroots = [\"src\"]\n").unwrap();
        assert_eq!(config.markers.declare, "Declare");
        assert_eq!(config.markers.import, "Import");
        assert!(config.markers.aliases.is_empty());
        assert_eq!(config.bundle.runtime, "Cache");
        assert_eq!(config.bundle.prune, PruneMode::OutsideFilter);
        assert!(config.bundle.implied_dependencies);
    }

    #[test]
    fn missing_roots_errors() {
        let err = load_config_from_str("[markers]\nimport = \"Use\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "sources.roots"));

        let err = load_config_from_str("[sources]\nroots = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_marker_name_errors() {
        let toml = "[sources]\nroots = [\"src\"]\n[markers]\nimport = \"\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "markers.import"));
    }

    #[test]
    fn alias_overlapping_canonical_errors() {
        let toml = "[sources]\nroots = [\"src\"]\n[markers]\naliases = \"Import\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Markers(_)));
    }

    #[test]
    fn identical_marker_names_error() {
        let toml = "[sources]\nroots = [\"src\"]\n[markers]\ndeclare = \"M\"\nimport = \"M\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Markers(_)));
    }

    #[test]
    fn blank_runtime_errors() {
        let toml = "[sources]\nroots = [\"src\"]\n[bundle]\nruntime = \"  \"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "bundle.runtime", .. }));
    }

    #[test]
    fn unknown_prune_mode_errors() {
        let toml = "[sources]\nroots = [\"src\"]\n[bundle]\nprune = \"sometimes\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[sources]\nroots = [\"pkgs\"]\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.sources.roots, vec![PathBuf::from("pkgs")]);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/dir").join(CONFIG_FILE));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
