//! URL to filesystem path resolution.

use crate::utils::path::url_to_relative;
use std::path::{Path, PathBuf};

/// Resolve URL to a file under `public`, handling index.html for directories
pub fn resolve_static(url: &str, public: &Path) -> Option<PathBuf> {
    let clean = url_to_relative(url);

    // Reject paths with suspicious patterns early
    if clean.contains("..") {
        return None;
    }

    let local = public.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under public
    let canonical = local.canonicalize().ok()?;
    let root_canonical = public.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}
