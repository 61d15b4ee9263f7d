//! # Output Configuration
//!
//! This module controls how pinsync talks to the user: whether colors and
//! emojis are used, and the `Reporter` that prints per-dependency status
//! lines and progress spinners.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Status lines go to stdout. Spinners draw on stderr and are hidden when
//! stderr is not a terminal.

use std::env;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// - `always`: force colors on (overrides NO_COLOR)
    /// - `never`: force colors off
    /// - anything else: detect from the environment and the terminal
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Prints user-facing status lines for a run.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    config: OutputConfig,
}

impl Reporter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Header line announcing the dependency about to be processed.
    pub fn heading(&self, text: &str) {
        let marker = emoji(&self.config, "📦", "==>");
        if self.config.use_color {
            println!("\n{} {}", marker, style(text).bold());
        } else {
            println!("\n{} {}", marker, text);
        }
    }

    pub fn info(&self, text: &str) {
        println!("{} {}", emoji(&self.config, "ℹ️ ", "[INFO]"), text);
    }

    pub fn success(&self, text: &str) {
        let marker = emoji(&self.config, "✅", "[OK]");
        if self.config.use_color {
            println!("{} {}", marker, style(text).green());
        } else {
            println!("{} {}", marker, text);
        }
    }

    pub fn skipped(&self, text: &str) {
        println!("{} {}", emoji(&self.config, "⏭️ ", "[SKIP]"), text);
    }

    pub fn warning(&self, text: &str) {
        let marker = emoji(&self.config, "⚠️ ", "[WARN]");
        if self.config.use_color {
            println!("{} {}", marker, style(text).yellow());
        } else {
            println!("{} {}", marker, text);
        }
    }

    pub fn failure(&self, text: &str) {
        let marker = emoji(&self.config, "❌", "[FAIL]");
        if self.config.use_color {
            println!("{} {}", marker, style(text).red());
        } else {
            println!("{} {}", marker, text);
        }
    }

    /// Indented list item, e.g. one tag of a tag list.
    pub fn item(&self, text: &str, highlighted: bool) {
        if highlighted && self.config.use_color {
            println!("   {}", style(text).cyan().bold());
        } else if highlighted {
            println!("   {} (latest)", text);
        } else {
            println!("   {}", text);
        }
    }

    /// Start a spinner on stderr. Hidden automatically when stderr is not a
    /// terminal; call `finish_and_clear` before prompting.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}
