//! # Update Command Implementation
//!
//! This module implements the `update` subcommand, which pins every
//! dependency named in the entry file to its latest release tag.
//!
//! ## Functionality
//!
//! - **Registration**: A URL entry whose dependency is not present yet is
//!   only added after explicit confirmation. A path entry that is not
//!   registered asks for the URL to add it from.
//!
//! - **Tag Refresh**: Tags are fetched with `--force --prune --prune-tags`,
//!   so tags deleted or moved upstream are reconciled locally.
//!
//! - **Selection**: The available tags are listed in version order and the
//!   latest one is offered as the default. Without tags, the tip of the
//!   remote's default branch is used.
//!
//! - **Pointer Commit**: After checkout the command offers to commit the new
//!   pointer in the enclosing project. `--no-commit` skips the offer.
//!
//! - **Non-interactive Use**: With `--non-interactive` (or
//!   `PINSYNC_NON_INTERACTIVE`), or when no terminal is attached, every
//!   question takes its default. `--yes` answers every confirmation with yes.
//!
//! The command exits with status 1 if any entry failed.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use clap::builder::FalseyValueParser;

use pinsync::defaults::{DEFAULT_ENTRY_FILE, NON_INTERACTIVE_ENV};
use pinsync::entry;
use pinsync::output::{OutputConfig, Reporter};
use pinsync::prompt::TerminalPrompter;
use pinsync::repository::DefaultRepositoryOperations;
use pinsync::sync::{SyncOptions, Synchronizer};

/// Pin dependencies to their latest tags
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// File listing one dependency URL or path per line.
    #[arg(value_name = "FILE", default_value = DEFAULT_ENTRY_FILE)]
    pub file: PathBuf,

    /// Answer yes to every confirmation, including registering new
    /// dependencies.
    #[arg(short, long)]
    pub yes: bool,

    /// Check out the selected references but never commit the pointers.
    #[arg(long)]
    pub no_commit: bool,

    /// Never prompt; every question takes its default answer. The variable
    /// accepts `1`/`true`/`yes`; `0`, `false`, `no`, `off` and empty mean off.
    #[arg(
        long,
        env = NON_INTERACTIVE_ENV,
        value_parser = FalseyValueParser::new()
    )]
    pub non_interactive: bool,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, output: OutputConfig) -> Result<ExitCode> {
    let entries = entry::read_entries(&args.file)?;

    let cwd = env::current_dir().context("Cannot determine the current directory")?;
    let repo = DefaultRepositoryOperations::discover(&cwd)?;

    let reporter = Reporter::new(output);
    if entries.is_empty() {
        reporter.info(&format!("No entries in {}", args.file.display()));
        return Ok(ExitCode::SUCCESS);
    }

    let prompter = TerminalPrompter::new(args.yes, args.non_interactive);
    let options = SyncOptions {
        commit: !args.no_commit,
    };

    let summary = Synchronizer::new(&repo, &prompter, &reporter, options).run(&entries);
    summary.print(&reporter);
    Ok(summary.exit_code())
}
