//! Source tree discovery.
//!
//! Walks source roots and lists every candidate source unit. Entries whose
//! name starts with `.` are skipped. In versioned mode each first-level
//! subdirectory of a root is a version, and files directly inside the root
//! are ignored.

use std::path::{Path, PathBuf};

use quiver_common::VersionLabel;

use crate::error::LoadError;

/// A source file to ingest and the version scope it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path of the file.
    pub path: PathBuf,
    /// Version scope, `None` when versioning is off.
    pub version: Option<VersionLabel>,
}

/// Lists the source units under `root`, sorted by version then path.
pub fn discover(root: &Path, versioned: bool) -> Result<Vec<SourceUnit>, LoadError> {
    let mut units = Vec::new();
    if versioned {
        for dir in list_dir(root)? {
            if !dir.is_dir() {
                continue;
            }
            let version = dir
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| VersionLabel::new(n).ok())
                .ok_or_else(|| LoadError::InvalidVersion { path: dir.clone() })?;
            tracing::debug!(%version, dir = %dir.display(), "found version directory");
            let mut files = Vec::new();
            walk_dir(&dir, &mut files)?;
            units.extend(files.into_iter().map(|path| SourceUnit {
                path,
                version: Some(version.clone()),
            }));
        }
    } else {
        let mut files = Vec::new();
        walk_dir(root, &mut files)?;
        units.extend(files.into_iter().map(|path| SourceUnit {
            path,
            version: None,
        }));
    }
    units.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.path.cmp(&b.path)));
    Ok(units)
}

/// Recursively collects regular files below `dir`.
///
/// Symlinked directories are not descended into.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    for path in list_dir(dir)? {
        if path.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "skipping symlinked directory");
            continue;
        }
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// Lists the non-hidden entries of a directory.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if is_hidden(&entry.file_name()) {
            continue;
        }
        paths.push(entry.path());
    }
    Ok(paths)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn rel(root: &Path, units: &[SourceUnit]) -> Vec<String> {
        units
            .iter()
            .map(|u| {
                u.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/x.js"));
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/loop")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a/x.js"), dir.path().join("y.js")).unwrap();

        let units = discover(dir.path(), false).unwrap();
        assert_eq!(rel(dir.path(), &units), vec!["a/x.js", "y.js"]);
    }

    #[test]
    fn flat_discovery_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.js"));
        touch(&dir.path().join("a/x.js"));
        touch(&dir.path().join("a/deep/y.js"));

        let units = discover(dir.path(), false).unwrap();
        assert_eq!(rel(dir.path(), &units), vec!["a/deep/y.js", "a/x.js", "b.js"]);
        assert!(units.iter().all(|u| u.version.is_none()));
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".git/config"));
        touch(&dir.path().join(".swap.js"));
        touch(&dir.path().join("keep.js"));

        let units = discover(dir.path(), false).unwrap();
        assert_eq!(rel(dir.path(), &units), vec!["keep.js"]);
    }

    #[test]
    fn versioned_discovery_uses_first_level_dirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("1.0/app/Main.js"));
        touch(&dir.path().join("2.0/app/Main.js"));
        touch(&dir.path().join("stray.js"));

        let units = discover(dir.path(), true).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].version.as_ref().unwrap().as_str(), "1.0");
        assert_eq!(units[1].version.as_ref().unwrap().as_str(), "2.0");
    }

    #[test]
    fn missing_root_is_io_error() {
        let err = discover(Path::new("/nonexistent/quiver/root"), false).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn empty_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), false).unwrap().is_empty());
        assert!(discover(dir.path(), true).unwrap().is_empty());
    }
}
