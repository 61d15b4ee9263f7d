//! # Dependency Pointer Synchronization
//!
//! This module pins each dependency of an entry list to a release tag and,
//! if the user agrees, records the new pointer in the enclosing project.
//!
//! ## Per-entry procedure
//!
//! 1.  **Resolve** the entry to a dependency path (`resolve`). URLs are looked
//!     up in the manifest by exact match; only unknown URLs fall back to the
//!     URL's basename.
//! 2.  **Gate**: make sure the dependency is registered and checked out,
//!     asking before registering anything new.
//! 3.  **Refresh** tags with a forced, pruning fetch and order them by
//!     version precedence.
//! 4.  **Select** the reference: the latest tag by default, or the remote's
//!     default branch when there are no tags.
//! 5.  **Check out** the reference detached.
//! 6.  **Record** the pointer with a commit in the enclosing project.
//!
//! Entries are processed strictly one after another. A failure ends the
//! current entry only; the run continues with the next one and the failure
//! is reflected in the `RunSummary`.

use std::fmt;

use log::{debug, info, warn};

use crate::entry::{DependencyEntry, EntryKind};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::output::Reporter;
use crate::path::{is_inside_project, normalize_path, url_basename};
use crate::prompt::Prompter;
use crate::repository::{CommitOutcome, RepositoryOperations};
use crate::summary::{EntryOutcome, EntryReport, RunSummary};
use crate::version::TagSet;

/// Where an entry points in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Dependency path relative to the project root. Never empty and never
    /// outside the project.
    pub path: String,
    /// Remote URL, when the entry is one or the manifest knows it.
    pub url: Option<String>,
    /// Whether the manifest has an entry at `path`.
    pub registered: bool,
}

/// Map an entry to its dependency path using the current manifest.
///
/// Pure and deterministic: the same entry and manifest always give the same
/// resolution. Fails with `Error::Resolution` when no path can be derived or
/// the path does not name a directory inside the project (`.`, `..`,
/// absolute paths).
pub fn resolve(entry: &DependencyEntry, manifest: &Manifest) -> Result<Resolution> {
    let resolution = match entry.kind() {
        EntryKind::Url => match manifest.find_by_url(entry.raw()) {
            Some(registered) => Resolution {
                path: registered.path.clone(),
                url: Some(registered.url.clone()),
                registered: true,
            },
            None => {
                let path = url_basename(entry.raw()).unwrap_or_default();
                debug!(
                    "{} is not in the manifest, guessing path '{}'",
                    entry.raw(),
                    path
                );
                Resolution {
                    registered: manifest.find_by_path(&path).is_some(),
                    path,
                    url: Some(entry.raw().to_string()),
                }
            }
        },
        EntryKind::Path => {
            let path = normalize_path(entry.raw());
            let registered = manifest.find_by_path(&path);
            Resolution {
                url: registered.map(|e| e.url.clone()),
                registered: registered.is_some(),
                path,
            }
        }
    };

    if resolution.path.is_empty() {
        return Err(Error::Resolution {
            entry: entry.raw().to_string(),
            message: "no dependency path can be derived from this entry".to_string(),
        });
    }
    if !is_inside_project(&resolution.path) {
        return Err(Error::Resolution {
            entry: entry.raw().to_string(),
            message: format!("'{}' is not a directory inside the project", resolution.path),
        });
    }
    Ok(resolution)
}

/// The reference a dependency is pinned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinnedReference {
    /// A release tag.
    Tag(String),
    /// The tip of the remote's default branch (e.g. `origin/main`), used when
    /// the dependency has no tags.
    DefaultBranch(String),
}

impl PinnedReference {
    /// Name to hand to checkout.
    pub fn name(&self) -> &str {
        match self {
            PinnedReference::Tag(name) | PinnedReference::DefaultBranch(name) => name,
        }
    }

    /// Commit message recording this pin for `path`.
    pub fn commit_message(&self, path: &str) -> String {
        match self {
            PinnedReference::Tag(tag) => format!("Update submodule {} to {}", path, tag),
            PinnedReference::DefaultBranch(branch) => format!(
                "Update submodule {} to {} (default branch, no tags)",
                path, branch
            ),
        }
    }
}

impl fmt::Display for PinnedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinnedReference::Tag(tag) => write!(f, "{}", tag),
            PinnedReference::DefaultBranch(branch) => {
                write!(f, "{} (default branch)", branch)
            }
        }
    }
}

/// What happened to the pointer in the enclosing project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUpdate {
    Committed,
    /// The recorded pointer already matched; not an error.
    NothingToCommit,
    /// The user declined (or `--no-commit` was given).
    Skipped,
}

/// The result of synchronizing one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDecision {
    pub path: String,
    pub reference: PinnedReference,
    pub pointer: PointerUpdate,
}

/// Knobs for a synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Offer to commit pointer updates. When false, no commit is made and the
    /// question is not asked.
    pub commit: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { commit: true }
    }
}

/// Result of the registration gate.
enum Gate {
    Ready,
    Declined(String),
}

/// Runs the synchronization procedure against an injected repository handle
/// and prompter.
pub struct Synchronizer<'a> {
    repo: &'a dyn RepositoryOperations,
    prompter: &'a dyn Prompter,
    reporter: &'a Reporter,
    options: SyncOptions,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        repo: &'a dyn RepositoryOperations,
        prompter: &'a dyn Prompter,
        reporter: &'a Reporter,
        options: SyncOptions,
    ) -> Self {
        Self {
            repo,
            prompter,
            reporter,
            options,
        }
    }

    /// Synchronize every entry in order and summarize the run.
    pub fn run(&self, entries: &[DependencyEntry]) -> RunSummary {
        let mut summary = RunSummary::new();
        for entry in entries {
            self.reporter.heading(entry.raw());
            let report = self.sync_entry(entry);
            report.announce(self.reporter);
            summary.push(report);
        }
        summary
    }

    /// Synchronize one entry. Never fails: errors end up in the report.
    pub fn sync_entry(&self, entry: &DependencyEntry) -> EntryReport {
        let manifest = match self.repo.manifest() {
            Ok(manifest) => manifest,
            Err(error) => {
                return EntryReport::new(entry, entry.raw(), EntryOutcome::failed(error))
            }
        };

        let resolution = match resolve(entry, &manifest) {
            Ok(resolution) => resolution,
            Err(error) => {
                return EntryReport::new(entry, entry.raw(), EntryOutcome::failed(error))
            }
        };

        let outcome = self
            .process(entry, &resolution)
            .unwrap_or_else(EntryOutcome::failed);
        EntryReport::new(entry, &resolution.path, outcome)
    }

    fn process(&self, entry: &DependencyEntry, resolution: &Resolution) -> Result<EntryOutcome> {
        let path = resolution.path.as_str();

        if let Gate::Declined(reason) = self.ensure_registered(entry, resolution)? {
            return Ok(EntryOutcome::Skipped { reason });
        }

        let tags = self.refresh_tags(path)?;
        let reference = self.select_reference(path, &tags)?;
        self.checkout(path, &reference)?;
        let decision = self.record_pointer(path, reference)?;

        Ok(EntryOutcome::Synced {
            reference: decision.reference,
            pointer: decision.pointer,
        })
    }

    /// Make sure the dependency at `resolution.path` is registered and
    /// checked out, asking before registering anything new.
    fn ensure_registered(&self, entry: &DependencyEntry, resolution: &Resolution) -> Result<Gate> {
        let path = resolution.path.as_str();

        if self.repo.is_checked_out(path) {
            return Ok(Gate::Ready);
        }

        if resolution.registered {
            // Known to the manifest but never initialized in this clone
            info!("Initializing registered dependency {}", path);
            self.reporter
                .info(&format!("Initializing registered dependency {}", path));
            let url = resolution.url.clone().unwrap_or_default();
            self.initialize(&url, path)?;
            return Ok(Gate::Ready);
        }

        let url = match entry.kind() {
            EntryKind::Url => {
                let url = entry.raw();
                let question = format!("{} is not present. Add submodule {} at {}?", path, url, path);
                if !self.prompter.confirm(&question, false)? {
                    return Ok(Gate::Declined("registration declined".to_string()));
                }
                url.to_string()
            }
            EntryKind::Path => {
                warn!("{} is not registered and has no URL", path);
                self.reporter.warning(&format!(
                    "{} is not a registered dependency; a path alone cannot be added without its URL",
                    path
                ));
                let url = self.prompter.input(
                    &format!("Remote URL for {} (leave empty to skip)", path),
                    "",
                )?;
                if url.is_empty() {
                    return Ok(Gate::Declined("no URL given".to_string()));
                }
                url
            }
        };

        self.repo.register(&url, path).map_err(|e| Error::Registration {
            path: path.to_string(),
            url: url.clone(),
            message: e.to_string(),
        })?;
        self.initialize(&url, path)?;
        self.reporter.success(&format!("Added {} at {}", url, path));
        Ok(Gate::Ready)
    }

    fn initialize(&self, url: &str, path: &str) -> Result<()> {
        self.repo
            .sync_config(path)
            .and_then(|_| self.repo.initialize(path))
            .map_err(|e| Error::Registration {
                path: path.to_string(),
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// Fetch tags (reconciling moved and deleted ones) and order them.
    pub fn refresh_tags(&self, path: &str) -> Result<TagSet> {
        let spinner = self
            .reporter
            .spinner(&format!("Fetching tags for {}...", path));
        let fetched = self.repo.fetch_tags(path);
        spinner.finish_and_clear();

        let refresh_error = |e: Error| Error::Refresh {
            path: path.to_string(),
            message: e.to_string(),
        };
        fetched.map_err(refresh_error)?;
        let tags = self.repo.list_tags(path).map_err(refresh_error)?;

        let tags = TagSet::new(tags);
        debug!("{} has {} tags", path, tags.len());
        Ok(tags)
    }

    /// Let the user pick a tag, defaulting to the latest one. Without tags
    /// the remote's default branch is used instead.
    pub fn select_reference(&self, path: &str, tags: &TagSet) -> Result<PinnedReference> {
        let Some(latest) = tags.latest() else {
            self.reporter.warning(&format!(
                "{} has no tags; pinning to the tip of its default branch",
                path
            ));
            let branch = self.repo.default_branch(path).map_err(|e| Error::Refresh {
                path: path.to_string(),
                message: format!("cannot resolve default branch: {}", e),
            })?;
            return Ok(PinnedReference::DefaultBranch(branch));
        };

        self.reporter.info(&format!("Available tags for {}:", path));
        for tag in tags.iter() {
            self.reporter.item(tag, tag == latest);
        }

        let answer = self
            .prompter
            .input(&format!("Tag to check out for {}", path), latest)?;
        if !tags.contains(&answer) {
            warn!("{} is not a known tag of {}", answer, path);
        }
        Ok(PinnedReference::Tag(answer))
    }

    /// Check out `reference` detached in `path`.
    pub fn checkout(&self, path: &str, reference: &PinnedReference) -> Result<()> {
        info!("Checking out {} in {}", reference.name(), path);
        self.repo
            .checkout_detached(path, reference.name())
            .map_err(|e| Error::Checkout {
                path: path.to_string(),
                reference: reference.name().to_string(),
                message: e.to_string(),
            })
    }

    /// Offer to commit the new pointer of `path` in the enclosing project.
    pub fn record_pointer(&self, path: &str, reference: PinnedReference) -> Result<SyncDecision> {
        let wanted = self.options.commit
            && self
                .prompter
                .confirm(&format!("Commit submodule pointer update for {}?", path), true)?;

        let pointer = if wanted {
            let commit_error = |e: Error| Error::Commit {
                path: path.to_string(),
                message: e.to_string(),
            };
            self.repo.stage(path).map_err(commit_error)?;
            match self
                .repo
                .commit_pointer(path, &reference.commit_message(path))
                .map_err(commit_error)?
            {
                CommitOutcome::Committed => PointerUpdate::Committed,
                CommitOutcome::NothingToCommit => PointerUpdate::NothingToCommit,
            }
        } else {
            PointerUpdate::Skipped
        };

        Ok(SyncDecision {
            path: path.to_string(),
            reference,
            pointer,
        })
    }
}
