//! Path manipulation utilities for pinsync

use std::path::{Component, Path};

use url::Url;

/// Normalize a dependency path for comparison with the manifest.
///
/// Leading `./` and trailing `/` are removed; the rest of the text is kept
/// verbatim.
pub fn normalize_path(path: &str) -> String {
    let mut path = path.trim();
    while let Some(stripped) = path.strip_prefix("./") {
        path = stripped;
    }
    path.trim_end_matches('/').to_string()
}

/// Whether `path` names a directory strictly inside the project.
///
/// Only plain relative components are allowed: empty paths, `.`, absolute
/// paths and anything with a `..` component are rejected. Interior `.`
/// components are ignored.
pub fn is_inside_project(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Derive a directory name from the last path segment of a remote URL.
///
/// A trailing `.git` is stripped. Scheme URLs are parsed with `url`; the
/// scp-like form (`git@host:org/repo.git`) is split on its last `/` or `:`.
/// Returns `None` when no usable segment remains.
pub fn url_basename(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');

    let segment = match Url::parse(trimmed) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        _ => trimmed.rsplit(['/', ':']).next().map(str::to_string),
    }?;

    let name = segment.strip_suffix(".git").unwrap_or(&segment);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
