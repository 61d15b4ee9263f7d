//! # Status Command Implementation
//!
//! This module implements the `status` subcommand, a read-only report of
//! every dependency named in the entry file: its resolved path, whether it
//! is registered and checked out, its current commit and tag, and the latest
//! tag known locally.
//!
//! `--fetch` refreshes tags from the remotes first. `--json` prints the
//! report as JSON instead of text.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use pinsync::defaults::DEFAULT_ENTRY_FILE;
use pinsync::entry;
use pinsync::output::{OutputConfig, Reporter};
use pinsync::repository::DefaultRepositoryOperations;
use pinsync::status::{status, StatusReport};

/// Show the state of dependencies
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// File listing one dependency URL or path per line.
    #[arg(value_name = "FILE", default_value = DEFAULT_ENTRY_FILE)]
    pub file: PathBuf,

    /// Refresh tags from the remotes before reporting.
    #[arg(long)]
    pub fetch: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, output: OutputConfig) -> Result<ExitCode> {
    let entries = entry::read_entries(&args.file)?;

    let cwd = env::current_dir().context("Cannot determine the current directory")?;
    let repo = DefaultRepositoryOperations::discover(&cwd)?;

    let reports = status(&repo, &entries, args.fetch);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let reporter = Reporter::new(output);
        for report in &reports {
            display(&reporter, report);
        }
    }

    if reports.iter().any(|r| r.error.is_some()) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn display(reporter: &Reporter, report: &StatusReport) {
    reporter.heading(&report.entry);

    if let Some(error) = &report.error {
        reporter.failure(&format!("{}: {}", report.path, error));
    }
    if report.path.is_empty() {
        return;
    }
    if !report.checked_out {
        let state = if report.registered {
            "registered, not initialized"
        } else {
            "not registered"
        };
        reporter.skipped(&format!("{}: {}", report.path, state));
        return;
    }

    let at = match (&report.current_tag, &report.commit) {
        (Some(tag), _) => tag.clone(),
        (None, Some(commit)) => commit.clone(),
        (None, None) => "unknown commit".to_string(),
    };
    match (report.up_to_date, &report.latest_tag) {
        (Some(true), _) => reporter.success(&format!("{} at {} (latest)", report.path, at)),
        (Some(false), Some(latest)) => {
            reporter.warning(&format!("{} at {}, latest is {}", report.path, at, latest))
        }
        _ => reporter.info(&format!("{} at {} (no tags known)", report.path, at)),
    }
}
