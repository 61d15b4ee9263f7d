//! Shared test utilities for E2E tests.
//!
//! This module provides fixtures that build throwaway git projects and
//! upstream repositories, so tests can run the `pinsync` binary against real
//! submodules.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_git_project();
//!     let url = fixture.upstream("engine", &["v1.0.0"]);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git;
    pub use super::TestFixture;
}

/// Environment that makes git usable in a bare test environment: a fixed
/// identity, no user or system config, and local `file://` submodules.
const GIT_ENV: &[(&str, &str)] = &[
    ("GIT_AUTHOR_NAME", "pinsync tests"),
    ("GIT_AUTHOR_EMAIL", "tests@example.com"),
    ("GIT_COMMITTER_NAME", "pinsync tests"),
    ("GIT_COMMITTER_EMAIL", "tests@example.com"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_COUNT", "1"),
    ("GIT_CONFIG_KEY_0", "protocol.file.allow"),
    ("GIT_CONFIG_VALUE_0", "always"),
];

/// Run git in `dir` and return its trimmed stdout. Panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(GIT_ENV.iter().copied())
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory holding a project and its upstream repositories.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Turn the `project` directory into a git repository with one commit.
    #[allow(dead_code)]
    pub fn with_git_project(self) -> Self {
        let project = self.path();
        std::fs::create_dir_all(&project).expect("Failed to create project dir");
        git(&project, &["init", "--quiet", "--initial-branch", "main"]);
        std::fs::write(project.join("README.md"), "# project\n").expect("Failed to write README");
        git(&project, &["add", "README.md"]);
        git(&project, &["commit", "--quiet", "-m", "Initial commit"]);
        self
    }

    /// Write the entry file (`submodules.md`) with the given content.
    pub fn with_entries(self, content: &str) -> Self {
        std::fs::create_dir_all(self.path()).expect("Failed to create project dir");
        std::fs::write(self.path().join("submodules.md"), content)
            .expect("Failed to write entry file");
        self
    }

    /// Create an upstream repository named `name` with one commit per tag,
    /// tagged in the given order. Returns its `file://` URL.
    #[allow(dead_code)]
    pub fn upstream(&self, name: &str, tags: &[&str]) -> String {
        let dir = self.temp_dir.path().join("upstream").join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create upstream dir");
        git(&dir, &["init", "--quiet", "--initial-branch", "main"]);
        std::fs::write(dir.join("VERSION"), "0\n").expect("Failed to write VERSION");
        git(&dir, &["add", "VERSION"]);
        git(&dir, &["commit", "--quiet", "-m", "Initial"]);
        for tag in tags {
            self.release(name, tag);
        }
        format!("file://{}", dir.display())
    }

    /// Add a commit to upstream `name` and tag it.
    #[allow(dead_code)]
    pub fn release(&self, name: &str, tag: &str) {
        let dir = self.upstream_dir(name);
        std::fs::write(dir.join("VERSION"), format!("{}\n", tag)).expect("Failed to write VERSION");
        git(&dir, &["commit", "--quiet", "-am", &format!("Release {}", tag)]);
        git(&dir, &["tag", tag]);
    }

    /// Register `url` at `path` in the project and commit it.
    #[allow(dead_code)]
    pub fn with_submodule(self, url: &str, path: &str) -> Self {
        let project = self.path();
        git(&project, &["submodule", "add", "--quiet", url, path]);
        git(&project, &["commit", "--quiet", "-m", &format!("Add {}", path)]);
        self
    }

    #[allow(dead_code)]
    pub fn upstream_dir(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("upstream").join(name)
    }

    /// Path of the project directory.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    /// Run git in the project directory.
    #[allow(dead_code)]
    pub fn git(&self, args: &[&str]) -> String {
        git(&self.path(), args)
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in the project directory, with
    /// prompts disabled and plain output.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pinsync");
        cmd.current_dir(self.path())
            .envs(GIT_ENV.iter().copied())
            .env("PINSYNC_NON_INTERACTIVE", "1")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_entries() {
        let fixture = TestFixture::new().with_entries("libs/a\n");
        assert!(fixture.path().join("submodules.md").exists());
    }
}
