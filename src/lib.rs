//! # pinsync
//!
//! This library keeps the dependency pointers (git submodules) of a project in
//! sync with their upstream release tags, and removes dependencies cleanly.
//! It backs the `pinsync` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use pinsync::entry::parse_entries;
//! use pinsync::memory::{MemoryRemote, MemoryRepository};
//! use pinsync::output::{OutputConfig, Reporter};
//! use pinsync::prompt::ScriptedPrompter;
//! use pinsync::sync::{SyncOptions, Synchronizer};
//!
//! let url = "https://example.com/engine.git";
//! let repo = MemoryRepository::new()
//!     .with_remote(url, MemoryRemote::new("main").with_tag("v1.9.0").with_tag("v1.10.0"))
//!     .with_dependency("engine", "libs/engine", url);
//!
//! let entries: Vec<_> = parse_entries("# pinned dependencies\nlibs/engine\n").collect();
//! let prompter = ScriptedPrompter::new(Vec::<String>::new());
//! let reporter = Reporter::new(OutputConfig::without_color());
//!
//! let summary = Synchronizer::new(&repo, &prompter, &reporter, SyncOptions::default())
//!     .run(&entries);
//! assert!(summary.is_success());
//! assert_eq!(repo.checked_out("libs/engine").unwrap(), "tag:v1.10.0");
//! ```
//!
//! ## Core Concepts
//!
//! - **Entries (`entry`)**: One dependency URL or path per line of the entry
//!   file.
//! - **Manifest (`manifest`)**: The registered dependencies, read from
//!   `.gitmodules`.
//! - **Repository handle (`repository`, `git`, `memory`)**: Every change to the
//!   project goes through `RepositoryOperations`, backed by the system `git`
//!   command or by an in-memory fake.
//! - **Prompts (`prompt`)**: Questions to the user go through `Prompter`,
//!   never through the entry reader.
//! - **Tag ordering (`version`)**: "Latest" means highest by semantic-version
//!   precedence.
//!
//! ## Execution Flow
//!
//! `sync::Synchronizer` handles one entry at a time, in order:
//!
//! 1.  **Resolve** the entry to a dependency path.
//! 2.  **Register** the dependency if needed, after confirmation.
//! 3.  **Refresh** its tags, reconciling deleted and moved ones.
//! 4.  **Select** the latest tag (or the default branch without tags).
//! 5.  **Check out** the selection detached.
//! 6.  **Commit** the new pointer, after confirmation.
//!
//! `remove::remove_all` deregisters and deletes dependencies, and
//! `status::status` reports on them without changing anything. Failures are
//! contained to their entry and collected in a `summary::RunSummary`.

pub mod defaults;
pub mod entry;
pub mod error;
pub mod git;
pub mod manifest;
pub mod memory;
pub mod output;
pub mod path;
pub mod prompt;
pub mod remove;
pub mod repository;
pub mod status;
pub mod summary;
pub mod sync;
pub mod version;

#[cfg(test)]
mod path_proptest;
#[cfg(test)]
mod version_proptest;
