//! # Dependency Entries
//!
//! An entry is one line of the entry list (by default `submodules.md`): either
//! the remote URL of a dependency or its path inside the project.
//!
//! The reader here is a pure function over text. It never touches standard
//! input, so answering prompts can never consume lines of the entry list.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Prefixes that mark an entry as a remote URL rather than a path.
const URL_PREFIXES: [&str; 5] = ["git@", "http://", "https://", "ssh://", "file://"];

/// Whether an entry names a remote or a local path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Url,
    Path,
}

/// One line of the entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    raw: String,
    kind: EntryKind,
}

impl DependencyEntry {
    /// Classify a (trimmed) entry by its prefix.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let kind = if URL_PREFIXES.iter().any(|prefix| raw.starts_with(prefix)) {
            EntryKind::Url
        } else {
            EntryKind::Path
        };
        Self { raw, kind }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_url(&self) -> bool {
        self.kind == EntryKind::Url
    }
}

impl fmt::Display for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Iterate the entries of an entry list, in order.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
pub fn parse_entries(content: &str) -> impl Iterator<Item = DependencyEntry> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(DependencyEntry::new)
}

/// Read the entry list from disk.
///
/// A missing file is a configuration error and aborts the run before any
/// entry is processed.
pub fn read_entries(path: &Path) -> Result<Vec<DependencyEntry>> {
    if !path.is_file() {
        return Err(Error::EntryFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_entries(&content).collect())
}
