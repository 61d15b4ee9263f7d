//! # Completions Command Implementation
//!
//! Generates shell completion scripts with `clap_complete` and writes them to
//! stdout.
//!
//! ```bash
//! pinsync completions bash > ~/.local/share/bash-completion/completions/pinsync
//! pinsync completions zsh > ~/.zfunc/_pinsync
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<ExitCode> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "pinsync", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
