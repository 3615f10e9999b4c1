//! Path resolution against a working directory.
//!
//! All relative paths the user supplies are anchored at an explicit working
//! directory instead of the process cwd, and display paths are rendered
//! relative to that same directory with `/` separators.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolves `path` against `base`.
///
/// An empty path yields `base` itself and relative paths are joined onto
/// `base`. The result is always lexically normalized.
#[must_use]
pub(crate) fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return normalize(base);
    }
    if path.is_absolute() {
        return normalize(path);
    }
    normalize(&base.join(path))
}

/// Resolves an output location and creates it on disk.
///
/// An existing file gets its parent created; anything else is treated as a
/// directory and created together with its missing ancestors.
///
/// # Errors
///
/// Returns an IO error if a directory cannot be created.
pub(crate) fn resolve_output_dir(base: &Path, path: &Path) -> Result<PathBuf> {
    let full = resolve_path(base, path);
    if full.is_file() {
        ensure_parent(&full)?;
    } else {
        ensure_dir(&full)?;
    }
    Ok(full)
}

/// Creates `dir` and all missing ancestors.
///
/// # Errors
///
/// Returns an IO error if creation fails.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        debug!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Creates the parent directory of `file` if it is missing.
///
/// # Errors
///
/// Returns an IO error if creation fails.
pub(crate) fn ensure_parent(file: &Path) -> Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Folds `.` and `..` components without touching the filesystem.
#[must_use]
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Renders `path` relative to `base` using `/` separators.
///
/// Paths outside `base` are returned in full; `base` itself renders as an
/// empty string.
#[must_use]
pub(crate) fn display_relative(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => to_slash(rel),
        Err(_) => to_slash(path),
    }
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
