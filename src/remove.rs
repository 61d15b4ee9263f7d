//! # Dependency Removal
//!
//! Deregisters and deletes the dependencies named by an entry list. Each
//! entry goes through four steps, in order:
//!
//! 1. `Deinit`: unregister the dependency and empty its working copy.
//! 2. `RemoveFromIndex`: drop it from the index and the manifest.
//! 3. `PurgeInternalState`: delete the backend's private clone.
//! 4. `DeleteWorkingDir`: delete whatever is left on disk.
//!
//! The first two only apply to dependencies the manifest still knows. An
//! unregistered directory is only cleaned up when it is recognizably what is
//! left of a dependency; anything else on disk is refused. A failing step
//! does not stop the others; every failure is reported with its
//! step and the entry counts as failed.
//!
//! Unlike `sync`, removal never commits. The caller is told to commit the
//! result separately.

use log::{debug, info, warn};

use crate::entry::DependencyEntry;
use crate::error::{Error, RemovalStep, Result};
use crate::output::Reporter;
use crate::repository::RepositoryOperations;
use crate::summary::{EntryOutcome, EntryReport, RunSummary};
use crate::sync::resolve;

/// Remove every entry in order and summarize the run.
pub fn remove_all(
    repo: &dyn RepositoryOperations,
    reporter: &Reporter,
    entries: &[DependencyEntry],
) -> RunSummary {
    let mut summary = RunSummary::new();
    for entry in entries {
        reporter.heading(entry.raw());
        let report = remove_entry(repo, entry);
        report.announce(reporter);
        summary.push(report);
    }
    summary
}

/// Remove the dependency named by one entry. Never fails: errors end up in
/// the report.
pub fn remove_entry(repo: &dyn RepositoryOperations, entry: &DependencyEntry) -> EntryReport {
    let manifest = match repo.manifest() {
        Ok(manifest) => manifest,
        Err(error) => return EntryReport::new(entry, entry.raw(), EntryOutcome::failed(error)),
    };

    let resolution = match resolve(entry, &manifest) {
        Ok(resolution) => resolution,
        Err(error) => return EntryReport::new(entry, entry.raw(), EntryOutcome::failed(error)),
    };
    let path = resolution.path.as_str();

    let registered = manifest.find_by_path(path);
    if registered.is_none() && !repo.path_exists(path) {
        debug!("{} is neither registered nor present", path);
        return EntryReport::new(entry, path, EntryOutcome::AlreadyAbsent);
    }

    // The private clone is keyed by name, which is gone once the manifest
    // entry is removed.
    let name = registered
        .map(|e| e.name.clone())
        .unwrap_or_else(|| path.to_string());

    if registered.is_none() && !repo.is_dependency_leftover(path, &name) {
        let error = Error::Resolution {
            entry: entry.raw().to_string(),
            message: format!("{} is not a dependency; refusing to delete it", path),
        };
        return EntryReport::new(entry, path, EntryOutcome::failed(error));
    }

    let mut errors = Vec::new();
    let mut record = |step: RemovalStep, result: Result<()>| {
        if let Err(e) = result {
            warn!("{}: {} failed: {}", path, step, e);
            errors.push(Error::Removal {
                path: path.to_string(),
                step,
                message: e.to_string(),
            });
        }
    };

    if registered.is_some() {
        record(RemovalStep::Deinit, repo.deinit(path));
        record(RemovalStep::RemoveFromIndex, repo.remove_from_index(path));
    } else {
        info!("{} is not registered, deleting leftovers only", path);
    }
    record(
        RemovalStep::PurgeInternalState,
        repo.purge_internal_state(&name),
    );
    record(RemovalStep::DeleteWorkingDir, repo.delete_working_dir(path));

    let outcome = if errors.is_empty() {
        EntryOutcome::Removed
    } else {
        EntryOutcome::Failed { errors }
    };
    EntryReport::new(entry, path, outcome)
}
