//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `pinsync` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `pinsync` library.
//!
//! Fatal setup errors (missing entry file, not inside a git work tree) are
//! returned as errors; per-entry failures only change the exit code.

pub mod completions;
pub mod remove;
pub mod status;
pub mod update;
