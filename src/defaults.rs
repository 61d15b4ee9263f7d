//! Default values for pinsync.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Entry list read when no file argument is given.
pub const DEFAULT_ENTRY_FILE: &str = "submodules.md";

/// Dependency manifest maintained by git at the project root.
pub const MANIFEST_FILE: &str = ".gitmodules";

/// Remote whose tags and default branch are consulted.
pub const DEFAULT_REMOTE: &str = "origin";

/// Environment variable that forces every prompt to its default answer.
pub const NON_INTERACTIVE_ENV: &str = "PINSYNC_NON_INTERACTIVE";

