//! # In-Memory Repository
//!
//! `MemoryRepository` implements `RepositoryOperations` without git or a
//! filesystem. Remotes are described up front (`MemoryRemote`), and the
//! repository tracks the state a real project would have: the manifest, the
//! commit each working copy has checked out, the pointer recorded in the
//! project, local tag caches and a commit log.
//!
//! Commit ids are synthetic: a tag `v1.0.0` points at `tag:v1.0.0` unless
//! it was created with an explicit commit, and a branch `main` points at
//! `branch:main`.
//!
//! ```
//! use pinsync::memory::{MemoryRemote, MemoryRepository};
//! use pinsync::repository::RepositoryOperations;
//!
//! let repo = MemoryRepository::new()
//!     .with_remote("https://example.com/a.git", MemoryRemote::new("main").with_tag("v1.0.0"))
//!     .with_dependency("a", "libs/a", "https://example.com/a.git");
//!
//! repo.fetch_tags("libs/a").unwrap();
//! assert_eq!(repo.list_tags("libs/a").unwrap(), vec!["v1.0.0".to_string()]);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::defaults::DEFAULT_REMOTE;
use crate::error::{Error, RemovalStep, Result};
use crate::manifest::{Manifest, ManifestEntry};
use crate::path::normalize_path;
use crate::repository::{CommitOutcome, RepositoryOperations};

/// A simulated remote repository.
#[derive(Debug, Clone)]
pub struct MemoryRemote {
    default_branch: String,
    tags: Vec<(String, String)>,
}

impl MemoryRemote {
    /// A remote whose default branch is `default_branch` and has no tags.
    pub fn new(default_branch: &str) -> Self {
        Self {
            default_branch: default_branch.to_string(),
            tags: Vec::new(),
        }
    }

    /// Add a tag pointing at its own synthetic commit.
    pub fn with_tag(self, tag: &str) -> Self {
        let commit = format!("tag:{}", tag);
        self.with_tag_at(tag, &commit)
    }

    /// Add a tag pointing at `commit`.
    pub fn with_tag_at(mut self, tag: &str, commit: &str) -> Self {
        self.tags.retain(|(t, _)| t != tag);
        self.tags.push((tag.to_string(), commit.to_string()));
        self
    }

    fn branch_commit(&self) -> String {
        format!("branch:{}", self.default_branch)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    manifest: Manifest,
    remotes: HashMap<String, MemoryRemote>,
    /// Directories present in the project, checked out or not.
    dirs: HashSet<String>,
    /// Commit checked out in each working copy.
    checkouts: HashMap<String, String>,
    /// Commit recorded for each dependency in the project's HEAD.
    recorded: HashMap<String, String>,
    /// Pointers staged but not yet committed.
    staged: HashMap<String, String>,
    /// Local tag cache of each working copy.
    local_tags: HashMap<String, Vec<(String, String)>>,
    /// Names with a private clone in the backend's internal state.
    internal: HashSet<String>,
    commits: Vec<String>,
    failing_checkouts: HashSet<String>,
    failing_steps: HashSet<(String, RemovalStep)>,
}

/// An in-memory project with dependencies.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `remote` reachable at `url`.
    pub fn with_remote(self, url: &str, remote: MemoryRemote) -> Self {
        self.set_remote(url, remote);
        self
    }

    /// Register, check out and record a dependency at its remote's default
    /// branch tip. The remote must already be added.
    pub fn with_dependency(self, name: &str, path: &str, url: &str) -> Self {
        if let Ok(mut state) = self.state() {
            let path = normalize_path(path);
            let commit = state
                .remotes
                .get(url)
                .map(MemoryRemote::branch_commit)
                .unwrap_or_default();
            state.manifest.insert(ManifestEntry {
                name: name.to_string(),
                path: path.clone(),
                url: url.to_string(),
            });
            state.dirs.insert(path.clone());
            state.checkouts.insert(path.clone(), commit.clone());
            state.recorded.insert(path, commit);
            state.internal.insert(name.to_string());
        }
        self
    }

    /// Register a dependency that has never been initialized: it has a
    /// manifest entry and an empty directory but no working copy.
    pub fn with_uninitialized_dependency(self, name: &str, path: &str, url: &str) -> Self {
        if let Ok(mut state) = self.state() {
            let path = normalize_path(path);
            let commit = state
                .remotes
                .get(url)
                .map(MemoryRemote::branch_commit)
                .unwrap_or_default();
            state.manifest.insert(ManifestEntry {
                name: name.to_string(),
                path: path.clone(),
                url: url.to_string(),
            });
            state.dirs.insert(path.clone());
            state.recorded.insert(path, commit);
        }
        self
    }

    /// Add a directory of the project's own that is not a dependency.
    pub fn with_plain_dir(self, path: &str) -> Self {
        if let Ok(mut state) = self.state() {
            state.dirs.insert(normalize_path(path));
        }
        self
    }

    /// Leave behind the working copy and private clone of a dependency whose
    /// manifest entry is already gone, as an interrupted removal would.
    pub fn with_leftover(self, path: &str, commit: &str) -> Self {
        if let Ok(mut state) = self.state() {
            let path = normalize_path(path);
            state.dirs.insert(path.clone());
            state.checkouts.insert(path.clone(), commit.to_string());
            state.internal.insert(path);
        }
        self
    }

    /// Make every checkout in `path` fail, as a dirty working copy would.
    pub fn with_failing_checkout(self, path: &str) -> Self {
        if let Ok(mut state) = self.state() {
            state.failing_checkouts.insert(normalize_path(path));
        }
        self
    }

    /// Make one removal step fail for `path` (or, for the purge step, for
    /// the dependency named `path`).
    pub fn with_failing_step(self, path: &str, step: RemovalStep) -> Self {
        if let Ok(mut state) = self.state() {
            state.failing_steps.insert((normalize_path(path), step));
        }
        self
    }

    /// Replace the remote at `url`, e.g. to publish, move or delete tags
    /// between two runs.
    pub fn set_remote(&self, url: &str, remote: MemoryRemote) {
        if let Ok(mut state) = self.state() {
            state.remotes.insert(url.to_string(), remote);
        }
    }

    /// Commit messages created so far, oldest first.
    pub fn commits(&self) -> Vec<String> {
        self.state().map(|s| s.commits.clone()).unwrap_or_default()
    }

    /// Commit checked out in `path`, if it is a working copy.
    pub fn checked_out(&self, path: &str) -> Option<String> {
        self.state()
            .ok()
            .and_then(|s| s.checkouts.get(&normalize_path(path)).cloned())
    }

    /// Commit recorded for `path` in the project's HEAD.
    pub fn recorded(&self, path: &str) -> Option<String> {
        self.state()
            .ok()
            .and_then(|s| s.recorded.get(&normalize_path(path)).cloned())
    }

    /// Whether the backend still holds a private clone for `name`.
    pub fn has_internal_state(&self, name: &str) -> bool {
        self.state()
            .map(|s| s.internal.contains(name))
            .unwrap_or(false)
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| Error::LockPoisoned {
            context: "memory repository state".to_string(),
        })
    }
}

impl MemoryState {
    fn remote_for(&self, path: &str) -> Result<&MemoryRemote> {
        let entry = self
            .manifest
            .find_by_path(path)
            .ok_or_else(|| git_error(path, "not a registered submodule"))?;
        self.remotes
            .get(&entry.url)
            .ok_or_else(|| git_error(path, "Could not read from remote repository"))
    }

    fn require_checkout(&self, path: &str) -> Result<&String> {
        self.checkouts
            .get(path)
            .ok_or_else(|| git_error(path, "not a git repository"))
    }

    fn fail_step(&self, path: &str, step: RemovalStep) -> Result<()> {
        if self.failing_steps.contains(&(path.to_string(), step)) {
            return Err(git_error(path, &format!("simulated {} failure", step)));
        }
        Ok(())
    }
}

fn git_error(path: &str, message: &str) -> Error {
    Error::GitCommand {
        command: "memory".to_string(),
        dir: path.to_string(),
        stderr: message.to_string(),
    }
}

impl RepositoryOperations for MemoryRepository {
    fn manifest(&self) -> Result<Manifest> {
        Ok(self.state()?.manifest.clone())
    }

    fn path_exists(&self, path: &str) -> bool {
        self.state()
            .map(|s| s.dirs.contains(&normalize_path(path)))
            .unwrap_or(false)
    }

    fn is_checked_out(&self, path: &str) -> bool {
        self.state()
            .map(|s| s.checkouts.contains_key(&normalize_path(path)))
            .unwrap_or(false)
    }

    fn is_dependency_leftover(&self, path: &str, name: &str) -> bool {
        self.state()
            .map(|s| s.checkouts.contains_key(&normalize_path(path)) || s.internal.contains(name))
            .unwrap_or(false)
    }

    fn register(&self, url: &str, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        if state.manifest.find_by_path(&path).is_some() {
            return Ok(());
        }
        let commit = state
            .remotes
            .get(url)
            .map(MemoryRemote::branch_commit)
            .ok_or_else(|| git_error(&path, "repository not found"))?;

        state.manifest.insert(ManifestEntry {
            name: path.clone(),
            path: path.clone(),
            url: url.to_string(),
        });
        state.dirs.insert(path.clone());
        state.checkouts.insert(path.clone(), commit.clone());
        state.staged.insert(path.clone(), commit);
        state.internal.insert(path);
        Ok(())
    }

    fn sync_config(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let state = self.state()?;
        state.remote_for(&path)?;
        Ok(())
    }

    fn initialize(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        let branch_commit = state.remote_for(&path)?.branch_commit();
        let name = state
            .manifest
            .find_by_path(&path)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| path.clone());
        if !state.checkouts.contains_key(&path) {
            let commit = state.recorded.get(&path).cloned().unwrap_or(branch_commit);
            state.checkouts.insert(path.clone(), commit);
        }
        state.dirs.insert(path);
        state.internal.insert(name);
        Ok(())
    }

    fn fetch_tags(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        state.require_checkout(&path)?;
        let tags = state.remote_for(&path)?.tags.clone();
        // Forced, pruning fetch: the local cache becomes exactly the remote's
        state.local_tags.insert(path, tags);
        Ok(())
    }

    fn list_tags(&self, path: &str) -> Result<Vec<String>> {
        let path = normalize_path(path);
        let state = self.state()?;
        state.require_checkout(&path)?;
        Ok(state
            .local_tags
            .get(&path)
            .map(|tags| tags.iter().map(|(t, _)| t.clone()).collect())
            .unwrap_or_default())
    }

    fn default_branch(&self, path: &str) -> Result<String> {
        let path = normalize_path(path);
        let state = self.state()?;
        state.require_checkout(&path)?;
        let remote = state.remote_for(&path)?;
        Ok(format!("{}/{}", DEFAULT_REMOTE, remote.default_branch))
    }

    fn checkout_detached(&self, path: &str, reference: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        state.require_checkout(&path)?;
        if state.failing_checkouts.contains(&path) {
            return Err(git_error(
                &path,
                "Your local changes to the following files would be overwritten by checkout",
            ));
        }

        let remote = state.remote_for(&path)?;
        let branch_ref = format!("{}/{}", DEFAULT_REMOTE, remote.default_branch);
        let commit = if reference == branch_ref {
            Some(remote.branch_commit())
        } else {
            state
                .local_tags
                .get(&path)
                .and_then(|tags| tags.iter().find(|(t, _)| t == reference))
                .map(|(_, commit)| commit.clone())
        };

        let commit = commit.ok_or_else(|| {
            git_error(
                &path,
                &format!("pathspec '{}' did not match any file(s) known to git", reference),
            )
        })?;
        state.checkouts.insert(path, commit);
        Ok(())
    }

    fn current_commit(&self, path: &str) -> Result<String> {
        let path = normalize_path(path);
        let state = self.state()?;
        let commit = state.require_checkout(&path)?.clone();
        Ok(commit)
    }

    fn current_tag(&self, path: &str) -> Option<String> {
        let path = normalize_path(path);
        let state = self.state().ok()?;
        let commit = state.checkouts.get(&path)?;
        state
            .local_tags
            .get(&path)?
            .iter()
            .find(|(_, c)| c == commit)
            .map(|(t, _)| t.clone())
    }

    fn stage(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        let commit = state.require_checkout(&path)?.clone();
        state.staged.insert(path, commit);
        Ok(())
    }

    fn commit_pointer(&self, path: &str, message: &str) -> Result<CommitOutcome> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        let Some(staged) = state.staged.remove(&path) else {
            return Ok(CommitOutcome::NothingToCommit);
        };
        if state.recorded.get(&path) == Some(&staged) {
            return Ok(CommitOutcome::NothingToCommit);
        }
        state.recorded.insert(path, staged);
        state.commits.push(message.to_string());
        Ok(CommitOutcome::Committed)
    }

    fn deinit(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        state.fail_step(&path, RemovalStep::Deinit)?;
        state.checkouts.remove(&path);
        state.local_tags.remove(&path);
        Ok(())
    }

    fn remove_from_index(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        state.fail_step(&path, RemovalStep::RemoveFromIndex)?;
        state.manifest.remove(&path);
        state.recorded.remove(&path);
        state.staged.remove(&path);
        Ok(())
    }

    fn purge_internal_state(&self, name: &str) -> Result<()> {
        let mut state = self.state()?;
        state.fail_step(name, RemovalStep::PurgeInternalState)?;
        state.internal.remove(name);
        Ok(())
    }

    fn delete_working_dir(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut state = self.state()?;
        state.fail_step(&path, RemovalStep::DeleteWorkingDir)?;
        state.dirs.remove(&path);
        state.checkouts.remove(&path);
        Ok(())
    }
}
