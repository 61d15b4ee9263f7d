//! # Remove Command Implementation
//!
//! This module implements the `remove` subcommand, which deregisters and
//! deletes every dependency named in the entry file.
//!
//! Dependencies that are already gone are reported and skipped. Every
//! removal step runs even if an earlier one failed, and each failure names
//! its step.
//!
//! Unlike `update`, this command never commits: the removal is left staged
//! for the user to review and commit.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use pinsync::defaults::DEFAULT_ENTRY_FILE;
use pinsync::entry;
use pinsync::error::Error;
use pinsync::output::{OutputConfig, Reporter};
use pinsync::remove::remove_all;
use pinsync::repository::DefaultRepositoryOperations;
use pinsync::summary::EntryOutcome;

/// Deregister and delete dependencies
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// File listing one dependency URL or path per line.
    #[arg(value_name = "FILE", default_value = DEFAULT_ENTRY_FILE)]
    pub file: PathBuf,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, output: OutputConfig) -> Result<ExitCode> {
    let entries = entry::read_entries(&args.file)?;

    let cwd = env::current_dir().context("Cannot determine the current directory")?;
    let repo = DefaultRepositoryOperations::discover(&cwd)?;

    let reporter = Reporter::new(output);
    let summary = remove_all(&repo, &reporter, &entries);
    summary.print(&reporter);

    // Refused entries never reached a removal step
    let changed = summary.reports().iter().any(|r| match &r.outcome {
        EntryOutcome::Removed => true,
        EntryOutcome::Failed { errors } => errors
            .iter()
            .any(|e| matches!(e, Error::Removal { .. })),
        _ => false,
    });
    if changed {
        reporter.info("Removals are staged but not committed. Review and commit them yourself:");
        println!("   git commit -m \"Remove submodules\"");
    }
    Ok(summary.exit_code())
}
