//! # Dependency Status
//!
//! A read-only look at the dependencies named by an entry list: where each
//! one resolves to, whether it is registered and checked out, which commit
//! and tag it sits on, and the latest tag known locally. With `fetch`, tags
//! are refreshed from the remote first; nothing else is changed.

use serde::Serialize;

use crate::entry::DependencyEntry;
use crate::repository::RepositoryOperations;
use crate::sync::resolve;
use crate::version::TagSet;

/// Status of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub entry: String,
    pub path: String,
    pub registered: bool,
    pub checked_out: bool,
    pub commit: Option<String>,
    pub current_tag: Option<String>,
    pub latest_tag: Option<String>,
    /// Whether the checked-out tag is the latest one. `None` when there is no
    /// tag to compare.
    pub up_to_date: Option<bool>,
    /// First error met while gathering the status, if any.
    pub error: Option<String>,
}

/// Gather the status of every entry, in order.
pub fn status(
    repo: &dyn RepositoryOperations,
    entries: &[DependencyEntry],
    fetch: bool,
) -> Vec<StatusReport> {
    entries
        .iter()
        .map(|entry| entry_status(repo, entry, fetch))
        .collect()
}

fn entry_status(repo: &dyn RepositoryOperations, entry: &DependencyEntry, fetch: bool) -> StatusReport {
    let mut report = StatusReport {
        entry: entry.raw().to_string(),
        path: String::new(),
        registered: false,
        checked_out: false,
        commit: None,
        current_tag: None,
        latest_tag: None,
        up_to_date: None,
        error: None,
    };

    let manifest = match repo.manifest() {
        Ok(manifest) => manifest,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };
    let resolution = match resolve(entry, &manifest) {
        Ok(resolution) => resolution,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };
    report.path = resolution.path;
    report.registered = resolution.registered;

    report.checked_out = repo.is_checked_out(&report.path);
    if !report.checked_out {
        return report;
    }

    if fetch {
        if let Err(e) = repo.fetch_tags(&report.path) {
            report.error = Some(e.to_string());
        }
    }

    match repo.current_commit(&report.path) {
        Ok(commit) => report.commit = Some(commit),
        Err(e) => {
            report.error.get_or_insert(e.to_string());
        }
    }
    report.current_tag = repo.current_tag(&report.path);

    match repo.list_tags(&report.path) {
        Ok(tags) => report.latest_tag = TagSet::new(tags).latest().map(str::to_string),
        Err(e) => {
            report.error.get_or_insert(e.to_string());
        }
    }

    if let Some(latest) = &report.latest_tag {
        report.up_to_date = Some(report.current_tag.as_ref() == Some(latest));
    }
    report
}
