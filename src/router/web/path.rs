//! URL to filesystem path resolution.

use crate::utils::url::has_parent_segment;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("{0} escapes the served directory")]
    Traversal(String),

    #[error("{0} not found")]
    NotFound(String),
}

/// Resolve the part of a request path below a mount prefix to a file in `dir`.
pub fn resolve_mounted(dir: &Path, relative: &str) -> Result<PathBuf, PathError> {
    // Reject before touching the filesystem
    if has_parent_segment(relative) {
        return Err(PathError::Traversal(relative.to_string()));
    }
    resolve_under(dir, relative.trim_matches('/'))
        .filter(|path| path.is_file())
        .ok_or_else(|| PathError::NotFound(relative.to_string()))
}

/// Resolve a decoded request path to a file under `serve_root`.
///
/// Directories resolve to their `index.html`; an extension-less file is
/// returned as-is.
pub fn resolve_path(url: &str, serve_root: &Path) -> Result<PathBuf, PathError> {
    if has_parent_segment(url) {
        return Err(PathError::Traversal(url.to_string()));
    }
    let not_found = || PathError::NotFound(url.to_string());
    let canonical = resolve_under(serve_root, url.trim_matches('/')).ok_or_else(not_found)?;

    if canonical.is_file() {
        return Ok(canonical);
    }
    let index = canonical.join("index.html");
    if canonical.is_dir() && index.is_file() {
        return Ok(index);
    }
    Err(not_found())
}

/// Canonicalize `root/relative`, keeping only results inside `root`.
fn resolve_under(root: &Path, relative: &str) -> Option<PathBuf> {
    // Symlinks can still point outside, so compare canonical forms
    let canonical = root.join(relative).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    canonical.starts_with(&root_canonical).then_some(canonical)
}
