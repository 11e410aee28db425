//! Async file utilities for the Folio crates.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{Error, Result};

/// Read a file's contents as a string.
///
/// A missing file yields [`Error::NotFound`]; any other failure keeps the
/// path in the error message.
pub async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Check if a path exists and is a regular file (symlinks followed).
pub async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Canonicalize a path, resolving symlinks.
pub async fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Whether `path` carries one of `extensions` (compared case-insensitively).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
