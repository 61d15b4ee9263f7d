//! # Error Handling
//!
//! This module defines the centralized error type for `pinsync`. It uses the
//! `thiserror` library to create an `Error` enum covering every failure mode
//! of a synchronization or removal run.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants carry the dependency path (and the
//!   reference or step where relevant) so that every failure can be reported
//!   against the dependency that caused it.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Only two variants are fatal to a whole run: `EntryFileNotFound` and
//! `NotARepository`. Everything else is raised while processing a single
//! entry and is contained to that entry by the batch driver in `sync` and
//! `remove`.
//!
//! Declining to register a dependency and finding nothing to commit are not
//! errors; they are modelled as outcomes (`EntryOutcome::Skipped` and
//! `CommitOutcome::NothingToCommit`).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single step of the removal procedure.
///
/// Each step is reported separately so a partial failure names exactly what
/// was left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalStep {
    Deinit,
    RemoveFromIndex,
    PurgeInternalState,
    DeleteWorkingDir,
}

impl fmt::Display for RemovalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemovalStep::Deinit => "deinit",
            RemovalStep::RemoveFromIndex => "remove from index",
            RemovalStep::PurgeInternalState => "purge internal state",
            RemovalStep::DeleteWorkingDir => "delete working directory",
        };
        f.write_str(name)
    }
}

/// Main error type for pinsync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The entry list file does not exist. Fatal, raised before any processing.
    #[error("Entry file not found: {}", path.display())]
    EntryFileNotFound { path: PathBuf },

    /// The current directory is not inside a git work tree. Fatal.
    #[error("Not inside a git repository: {}: {message}", path.display())]
    NotARepository { path: PathBuf, message: String },

    /// An entry could not be mapped to a dependency path.
    #[error("Cannot resolve entry '{entry}': {message}")]
    Resolution { entry: String, message: String },

    /// Registering a new dependency failed.
    #[error("Failed to register {path} from {url}: {message}")]
    Registration {
        path: String,
        url: String,
        message: String,
    },

    /// Refreshing tags (or resolving the default branch) failed.
    #[error("Failed to refresh tags for {path}: {message}")]
    Refresh { path: String, message: String },

    /// Checking out the selected reference failed.
    #[error("Failed to check out {reference} in {path}: {message}")]
    Checkout {
        path: String,
        reference: String,
        message: String,
    },

    /// Recording the new pointer in the enclosing project failed.
    #[error("Failed to commit pointer for {path}: {message}")]
    Commit { path: String, message: String },

    /// One step of the removal procedure failed.
    #[error("Failed to {step} for {path}: {message}")]
    Removal {
        path: String,
        step: RemovalStep,
        message: String,
    },

    /// A git invocation failed.
    #[error("Git command failed in {dir}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// The dependency manifest could not be parsed.
    #[error("Manifest parsing error: {message}")]
    Manifest { message: String },

    /// Reading an answer from the terminal failed.
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// An error indicating that a mutex has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt {
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
