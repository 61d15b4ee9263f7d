//! # pinsync CLI
//!
//! This is the binary entry point for the `pinsync` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning fatal errors into a message and a nonzero exit status.
//!
//! The synchronization logic lives in the `pinsync` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    cli.execute()
}
