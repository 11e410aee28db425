//! Path resolution utilities.
//!
//! Request paths arrive as strings from the outside world. Everything here
//! exists to turn them into paths that provably stay under the content root.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Turns a root-anchored request path into a clean relative path.
///
/// Leading slashes are dropped (`/guides/a.md` is the same document as
/// `guides/a.md`), `.` segments are ignored, and both `/` and `\` act as
/// separators. Any `..` segment, drive prefix, or an empty result is
/// rejected.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use folio_core::util::paths::sanitize_relative;
///
/// assert_eq!(
///     sanitize_relative("/guides/./intro.md").unwrap(),
///     PathBuf::from("guides/intro.md")
/// );
/// assert!(sanitize_relative("../etc/passwd").is_err());
/// ```
pub fn sanitize_relative(input: &str) -> Result<PathBuf> {
    let normalized = input.trim().replace('\\', "/");
    let trimmed = normalized.trim_start_matches('/');

    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(segment) => clean.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                log::debug!("rejecting request path with '..': {input}");
                return Err(Error::invalid_path(format!(
                    "'{input}' climbs out of the content root"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::invalid_path(format!("'{input}' is not relative")));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(Error::invalid_path("empty path"));
    }
    Ok(clean)
}

/// Returns true if `candidate` lies at or under `root`.
///
/// Both paths should already be canonical; this is a component-wise
/// prefix check, so `/srv/docs-old` is not inside `/srv/docs`.
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

/// Renders a relative path with `/` separators regardless of platform.
pub fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Expands `~` to the user's home directory.
///
/// If the path starts with `~`, replaces it with the user's home directory.
/// Otherwise returns the path unchanged.
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
