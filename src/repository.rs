//! # Repository State Handle
//!
//! This module defines `RepositoryOperations`, the single handle through which
//! the synchronizer reads and changes the enclosing project: its manifest,
//! its index, and the working copies of its dependencies.
//!
//! ## Design
//!
//! Every operation in `sync`, `remove` and `status` receives the handle as an
//! explicit `&dyn RepositoryOperations` argument; nothing reaches the
//! repository through global state. Two implementations exist:
//!
//! - **`DefaultRepositoryOperations`**: wraps the system `git` command (see
//!   `git`), rooted at the top level of the enclosing work tree.
//! - **`MemoryRepository`** (in `memory`): an in-memory fake used by tests to
//!   simulate remotes, tags, checkouts and failures without touching disk.
//!
//! All paths passed to the handle are dependency paths relative to the
//! project root.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::defaults::MANIFEST_FILE;
use crate::error::{Error, Result};
use crate::git;
use crate::manifest::Manifest;
use crate::path::is_inside_project;

/// Result of recording a dependency pointer in the enclosing project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A commit was created.
    Committed,
    /// The recorded pointer already matches the working copy.
    NothingToCommit,
}

/// Operations the synchronizer needs from the version-control backend.
pub trait RepositoryOperations {
    /// Read the current dependency manifest.
    fn manifest(&self) -> Result<Manifest>;

    /// Whether anything (even an empty directory) exists at `path`.
    fn path_exists(&self, path: &str) -> bool;

    /// Whether `path` holds a checked-out working copy of a dependency.
    fn is_checked_out(&self, path: &str) -> bool;

    /// Whether `path` holds what is left of a dependency: a working copy
    /// whose `.git` links into the backend, or a private clone for `name`.
    /// Plain project directories and independent repositories are not.
    fn is_dependency_leftover(&self, path: &str, name: &str) -> bool;

    /// Register `url` at `path` and clone it. Registering an already
    /// registered path succeeds without doing anything.
    fn register(&self, url: &str, path: &str) -> Result<()>;

    /// Propagate the manifest URL of `path` into local configuration.
    fn sync_config(&self, path: &str) -> Result<()>;

    /// Clone and check out the recorded commit of a registered dependency.
    fn initialize(&self, path: &str) -> Result<()>;

    /// Force-fetch tags from the dependency's remote, pruning deleted refs
    /// and tags.
    fn fetch_tags(&self, path: &str) -> Result<()>;

    /// Tags known locally for the dependency, in no particular order.
    fn list_tags(&self, path: &str) -> Result<Vec<String>>;

    /// The remote's default branch as a checkout-able name (`origin/main`).
    fn default_branch(&self, path: &str) -> Result<String>;

    /// Check out `reference` in `path` with a detached HEAD.
    fn checkout_detached(&self, path: &str, reference: &str) -> Result<()>;

    /// Commit id currently checked out in `path`.
    fn current_commit(&self, path: &str) -> Result<String>;

    /// Tag pointing exactly at the checked-out commit of `path`, if any.
    fn current_tag(&self, path: &str) -> Option<String>;

    /// Stage the pointer of `path` (and the manifest) in the project index.
    fn stage(&self, path: &str) -> Result<()>;

    /// Commit the staged pointer of `path`, or report that nothing changed.
    fn commit_pointer(&self, path: &str, message: &str) -> Result<CommitOutcome>;

    /// Unregister `path` and empty its working copy.
    fn deinit(&self, path: &str) -> Result<()>;

    /// Remove `path` from the index and the manifest.
    fn remove_from_index(&self, path: &str) -> Result<()>;

    /// Delete the backend's private clone of the dependency named `name`.
    fn purge_internal_state(&self, name: &str) -> Result<()>;

    /// Delete whatever is left of the working directory at `path`.
    fn delete_working_dir(&self, path: &str) -> Result<()>;
}

/// The default implementation of `RepositoryOperations`, which uses the
/// system's `git` command against a real work tree.
pub struct DefaultRepositoryOperations {
    root: PathBuf,
}

impl DefaultRepositoryOperations {
    /// Open the work tree containing `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let root = git::show_toplevel(dir)?;
        debug!("Project root: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dependency_dir(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Location of the private clone of the dependency named `name`.
    fn internal_clone_dir(&self, name: &str) -> Result<PathBuf> {
        if !is_inside_project(name) {
            return Err(Error::Manifest {
                message: format!("invalid submodule name '{}'", name),
            });
        }
        Ok(git::common_dir(&self.root)?.join("modules").join(name))
    }

    /// Paths to stage and commit together with a dependency pointer.
    fn pointer_paths<'a>(&self, path: &'a str) -> Vec<&'a str> {
        if self.root.join(MANIFEST_FILE).is_file() {
            vec![path, MANIFEST_FILE]
        } else {
            vec![path]
        }
    }
}

impl RepositoryOperations for DefaultRepositoryOperations {
    fn manifest(&self) -> Result<Manifest> {
        let manifest_path = self.root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Ok(Manifest::new());
        }
        Manifest::parse(&fs::read_to_string(manifest_path)?)
    }

    fn path_exists(&self, path: &str) -> bool {
        self.dependency_dir(path).exists()
    }

    fn is_checked_out(&self, path: &str) -> bool {
        // A submodule working copy has a `.git` file (or directory); an
        // uninitialized one is an empty directory.
        self.dependency_dir(path).join(".git").exists()
    }

    fn is_dependency_leftover(&self, path: &str, name: &str) -> bool {
        // A submodule checkout has a `gitdir:` link file, never a directory
        if self.dependency_dir(path).join(".git").is_file() {
            return true;
        }
        self.internal_clone_dir(name)
            .map(|dir| dir.is_dir())
            .unwrap_or(false)
    }

    fn register(&self, url: &str, path: &str) -> Result<()> {
        if self.manifest()?.find_by_path(path).is_some() {
            debug!("{} is already registered", path);
            return Ok(());
        }
        git::submodule_add(&self.root, url, path)
    }

    fn sync_config(&self, path: &str) -> Result<()> {
        git::submodule_sync(&self.root, path)
    }

    fn initialize(&self, path: &str) -> Result<()> {
        git::submodule_init(&self.root, path)
    }

    fn fetch_tags(&self, path: &str) -> Result<()> {
        git::fetch_tags(&self.dependency_dir(path))
    }

    fn list_tags(&self, path: &str) -> Result<Vec<String>> {
        git::list_tags(&self.dependency_dir(path))
    }

    fn default_branch(&self, path: &str) -> Result<String> {
        git::default_branch(&self.dependency_dir(path))
    }

    fn checkout_detached(&self, path: &str, reference: &str) -> Result<()> {
        git::checkout_detached(&self.dependency_dir(path), reference)
    }

    fn current_commit(&self, path: &str) -> Result<String> {
        git::head_commit(&self.dependency_dir(path))
    }

    fn current_tag(&self, path: &str) -> Option<String> {
        git::tag_at_head(&self.dependency_dir(path))
    }

    fn stage(&self, path: &str) -> Result<()> {
        git::add(&self.root, &self.pointer_paths(path))
    }

    fn commit_pointer(&self, path: &str, message: &str) -> Result<CommitOutcome> {
        let paths = self.pointer_paths(path);
        if !git::has_staged_changes(&self.root, &paths)? {
            return Ok(CommitOutcome::NothingToCommit);
        }
        git::commit_paths(&self.root, message, &paths)?;
        Ok(CommitOutcome::Committed)
    }

    fn deinit(&self, path: &str) -> Result<()> {
        git::submodule_deinit(&self.root, path)
    }

    fn remove_from_index(&self, path: &str) -> Result<()> {
        git::rm(&self.root, path)
    }

    fn purge_internal_state(&self, name: &str) -> Result<()> {
        let modules_dir = self.internal_clone_dir(name)?;
        if modules_dir.exists() {
            debug!("Removing {}", modules_dir.display());
            fs::remove_dir_all(modules_dir)?;
        }
        Ok(())
    }

    fn delete_working_dir(&self, path: &str) -> Result<()> {
        let dir = self.dependency_dir(path);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}
