//! Locating `quiver.toml` and opening the package service it describes.

use std::path::{Path, PathBuf};

use quiver_config::{QuiverConfig, CONFIG_FILE};
use quiver_loader::{LoadReport, Verbatim};
use quiver_service::PackageService;

use crate::GlobalArgs;

/// Walks up from `start` looking for a directory containing `quiver.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the configuration file path from global CLI args.
///
/// If `--config` is specified, uses that path (directory → its `quiver.toml`).
/// Otherwise walks up from the current directory looking for `quiver.toml`.
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE))
            } else {
                Ok(p)
            }
        }
        None => Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE)),
    }
}

/// Loads the configuration and the directory its relative roots are based on.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(QuiverConfig, PathBuf), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(global)?;
    let config = quiver_config::load_config_file(&config_path)
        .map_err(|e| format!("{}: {e}", config_path.display()))?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(config = %config_path.display(), "loaded configuration");
    Ok((config, base_dir))
}

/// Opens the package service and loads every configured source root.
///
/// Sources are delivered as written; no transformation step is configured
/// from the command line.
pub fn open_service(
    global: &GlobalArgs,
) -> Result<(PackageService, LoadReport), Box<dyn std::error::Error>> {
    let (config, base_dir) = load_project(global)?;
    let (service, report) = PackageService::open(config, base_dir, Box::new(Verbatim))?;
    Ok((service, report))
}
