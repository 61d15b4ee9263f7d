//! # Run Summary
//!
//! Each processed entry produces an `EntryReport`. The batch drivers in
//! `sync` and `remove` collect them into a `RunSummary`, which decides the
//! exit status of the run: failure if any entry failed, success otherwise.
//! Entries skipped by the user's choice are not failures.

use std::process::ExitCode;

use crate::entry::DependencyEntry;
use crate::error::Error;
use crate::output::Reporter;
use crate::sync::{PinnedReference, PointerUpdate};

/// What happened to one entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// Checked out at `reference`; `pointer` tells what happened in the
    /// enclosing project.
    Synced {
        reference: PinnedReference,
        pointer: PointerUpdate,
    },
    /// Fully deregistered and deleted.
    Removed,
    /// Removal requested for a dependency that is not there.
    AlreadyAbsent,
    /// Skipped on purpose (e.g. registration declined).
    Skipped { reason: String },
    /// One or more steps failed.
    Failed { errors: Vec<Error> },
}

impl EntryOutcome {
    pub fn failed(error: Error) -> Self {
        EntryOutcome::Failed {
            errors: vec![error],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, EntryOutcome::Failed { .. })
    }
}

/// Outcome of one entry, with the path it resolved to.
#[derive(Debug)]
pub struct EntryReport {
    pub entry: DependencyEntry,
    /// Resolved dependency path; the raw entry text when resolution failed.
    pub path: String,
    pub outcome: EntryOutcome,
}

impl EntryReport {
    pub fn new(entry: &DependencyEntry, path: &str, outcome: EntryOutcome) -> Self {
        Self {
            entry: entry.clone(),
            path: path.to_string(),
            outcome,
        }
    }

    /// Print the outcome line(s) for this entry.
    pub fn announce(&self, reporter: &Reporter) {
        match &self.outcome {
            EntryOutcome::Synced { reference, pointer } => {
                reporter.success(&format!("{} pinned to {}", self.path, reference));
                match pointer {
                    PointerUpdate::Committed => {
                        reporter.info(&format!("Committed pointer update for {}", self.path))
                    }
                    PointerUpdate::NothingToCommit => reporter.info(&format!(
                        "{} pointer unchanged, nothing to commit",
                        self.path
                    )),
                    PointerUpdate::Skipped => reporter.info(&format!(
                        "Commit skipped for {}; the checkout is left in place",
                        self.path
                    )),
                }
            }
            EntryOutcome::Removed => reporter.success(&format!("Removed {}", self.path)),
            EntryOutcome::AlreadyAbsent => {
                reporter.skipped(&format!("{} is already absent", self.path))
            }
            EntryOutcome::Skipped { reason } => {
                reporter.skipped(&format!("Skipping {}: {}", self.path, reason))
            }
            EntryOutcome::Failed { errors } => {
                for error in errors {
                    reporter.failure(&format!("{}: {}", self.path, error));
                }
            }
        }
    }
}

/// All entry reports of a run, in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    reports: Vec<EntryReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: EntryReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[EntryReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Print the totals line.
    pub fn print(&self, reporter: &Reporter) {
        let failed = self.failed_count();
        let skipped = self
            .reports
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    EntryOutcome::Skipped { .. } | EntryOutcome::AlreadyAbsent
                )
            })
            .count();
        let done = self.len() - failed - skipped;

        println!();
        let line = format!(
            "{} entries: {} done, {} skipped, {} failed",
            self.len(),
            done,
            skipped,
            failed
        );
        if failed == 0 {
            reporter.success(&line);
        } else {
            reporter.failure(&line);
            for report in self.reports.iter().filter(|r| r.outcome.is_failure()) {
                println!("   {}", report.path);
            }
        }
    }
}
