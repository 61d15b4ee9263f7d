//! # Dependency Manifest
//!
//! The manifest is the project's registry of dependencies, kept by git in
//! `.gitmodules`:
//!
//! ```text
//! [submodule "cloud-iam"]
//!     path = platform/cloud-iam
//!     url = git@github.com:org/cloud-iam.git
//! ```
//!
//! Lookups by URL are exact string matches. Two remotes can share a basename,
//! and a remote can be registered at any path, so the manifest is the only
//! reliable source for a URL's location.

use ini::Ini;
use log::warn;

use crate::error::{Error, Result};
use crate::path::normalize_path;

/// A dependency registered in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Submodule name (the quoted part of the section header).
    pub name: String,
    /// Normalized path relative to the project root.
    pub path: String,
    pub url: String,
}

/// The set of registered dependencies, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `.gitmodules` file.
    ///
    /// Sections missing a `path` or `url` are skipped with a warning.
    pub fn parse(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str(content).map_err(|e| Error::Manifest {
            message: e.to_string(),
        })?;

        let mut manifest = Manifest::new();
        for (section, properties) in ini.iter() {
            let Some(section) = section else { continue };
            let Some(name) = submodule_name(section) else {
                continue;
            };

            match (properties.get("path"), properties.get("url")) {
                (Some(path), Some(url)) => manifest.insert(ManifestEntry {
                    name: name.to_string(),
                    path: normalize_path(path),
                    url: url.trim().to_string(),
                }),
                _ => warn!("Skipping submodule '{}' without both path and url", name),
            }
        }

        Ok(manifest)
    }

    /// Add an entry, replacing any entry already registered at the same path.
    pub fn insert(&mut self, entry: ManifestEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.path == entry.path) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Remove the entry at `path`, returning it if present.
    pub fn remove(&mut self, path: &str) -> Option<ManifestEntry> {
        let path = normalize_path(path);
        let index = self.entries.iter().position(|e| e.path == path)?;
        Some(self.entries.remove(index))
    }

    /// Find the entry whose URL is exactly `url`.
    pub fn find_by_url(&self, url: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.url == url)
    }

    /// Find the entry registered at `path`.
    pub fn find_by_path(&self, path: &str) -> Option<&ManifestEntry> {
        let path = normalize_path(path);
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract `name` from a `submodule "name"` section header.
fn submodule_name(section: &str) -> Option<&str> {
    let rest = section.trim().strip_prefix("submodule")?;
    if !rest.starts_with([' ', '\t', '"']) {
        return None;
    }
    let name = rest.trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
