//! # Human Input Channel
//!
//! Every question pinsync asks goes through the `Prompter` trait, kept
//! separate from the entry-list reader so that the two streams can never be
//! confused.
//!
//! - **`TerminalPrompter`** asks on the controlling terminal with `dialoguer`.
//!   Keys are read from the terminal device, not from standard input, so a
//!   redirected stdin is never consumed as answers. Without an attended
//!   terminal every question resolves to its default immediately.
//! - **`ScriptedPrompter`** replays canned answers, for tests and automation.

use std::collections::VecDeque;
use std::sync::Mutex;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use log::debug;

use crate::error::{Error, Result};

/// Ask the user a question and return the answer.
pub trait Prompter {
    /// Yes/no question. Returns `default` when the user just presses enter.
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;

    /// Free-text question. An empty answer yields `default` (which may itself
    /// be empty).
    fn input(&self, question: &str, default: &str) -> Result<String>;
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    interactive: bool,
    assume_yes: bool,
}

impl TerminalPrompter {
    /// Create a prompter.
    ///
    /// `assume_yes` answers every confirmation with yes. `non_interactive`
    /// makes every question return its default; the same happens when
    /// stderr is not attended by a user.
    pub fn new(assume_yes: bool, non_interactive: bool) -> Self {
        let interactive = !non_interactive && console::user_attended_stderr();
        debug!(
            "Prompter: interactive={}, assume_yes={}",
            interactive, assume_yes
        );
        Self {
            theme: ColorfulTheme::default(),
            interactive,
            assume_yes,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            debug!("{} -> yes (assumed)", question);
            return Ok(true);
        }
        if !self.interactive {
            debug!("{} -> {} (default, no terminal)", question, default);
            return Ok(default);
        }

        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(default)
            .interact()?)
    }

    fn input(&self, question: &str, default: &str) -> Result<String> {
        if !self.interactive {
            debug!("{} -> '{}' (default, no terminal)", question, default);
            return Ok(default.to_string());
        }

        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text()?;

        let answer = answer.trim();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }
}

/// Replays a fixed list of answers in order.
///
/// An empty answer, or running out of answers, selects the question's
/// default. Confirmations accept `y`/`yes` and `n`/`no` (any case).
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> Result<Vec<String>> {
        Ok(self.asked.lock().map_err(|_| poisoned())?.clone())
    }

    fn next_answer(&self, question: &str) -> Result<Option<String>> {
        self.asked
            .lock()
            .map_err(|_| poisoned())?
            .push(question.to_string());
        let answer = self.answers.lock().map_err(|_| poisoned())?.pop_front();
        Ok(answer
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()))
    }
}

fn poisoned() -> Error {
    Error::LockPoisoned {
        context: "scripted prompter".to_string(),
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        match self.next_answer(question)? {
            None => Ok(default),
            Some(answer) => match answer.to_lowercase().as_str() {
                "y" | "yes" => Ok(true),
                "n" | "no" => Ok(false),
                other => Err(Error::Prompt {
                    message: format!("'{}' is not a yes/no answer to '{}'", other, question),
                }),
            },
        }
    }

    fn input(&self, question: &str, default: &str) -> Result<String> {
        Ok(self
            .next_answer(question)?
            .unwrap_or_else(|| default.to_string()))
    }
}
