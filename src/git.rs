use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::defaults::DEFAULT_REMOTE;
use crate::error::{Error, Result};

/// Run `git` in `dir` and capture its output, whatever the exit status.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
fn output(dir: &Path, args: &[&str]) -> Result<Output> {
    debug!("git {} (in {})", args.join(" "), dir.display());
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            dir: dir.display().to_string(),
            stderr: e.to_string(),
        })
}

/// Run `git` in `dir`, failing on a nonzero exit, and return trimmed stdout.
fn run(dir: &Path, args: &[&str]) -> Result<String> {
    let output = output(dir, args)?;
    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            dir: dir.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Find the top level of the work tree containing `dir`.
pub fn show_toplevel(dir: &Path) -> Result<PathBuf> {
    run(dir, &["rev-parse", "--show-toplevel"])
        .map(PathBuf::from)
        .map_err(|e| Error::NotARepository {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })
}

/// Locate the git directory shared by all work trees (`.git` in the usual case).
pub fn common_dir(root: &Path) -> Result<PathBuf> {
    let dir = PathBuf::from(run(root, &["rev-parse", "--git-common-dir"])?);
    Ok(if dir.is_absolute() { dir } else { root.join(dir) })
}

/// Register `url` as a submodule at `path` and clone it.
pub fn submodule_add(root: &Path, url: &str, path: &str) -> Result<()> {
    run(root, &["submodule", "add", "--", url, path]).map(drop)
}

/// Copy the manifest URL of `path` into the local git config.
pub fn submodule_sync(root: &Path, path: &str) -> Result<()> {
    run(root, &["submodule", "sync", "--", path]).map(drop)
}

/// Clone (if needed) and check out the recorded commit of `path`.
pub fn submodule_init(root: &Path, path: &str) -> Result<()> {
    run(root, &["submodule", "update", "--init", "--", path]).map(drop)
}

/// Fetch all tags from the dependency's remote, reconciling moved and
/// deleted tags with the local ones.
pub fn fetch_tags(dir: &Path) -> Result<()> {
    let args = [
        "fetch",
        DEFAULT_REMOTE,
        "--tags",
        "--force",
        "--prune",
        "--prune-tags",
    ];
    let output = output(dir, &args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let stderr = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };

        return Err(Error::GitCommand {
            command: args.join(" "),
            dir: dir.display().to_string(),
            stderr,
        });
    }

    Ok(())
}

/// List local tags of the repository at `dir`.
pub fn list_tags(dir: &Path) -> Result<Vec<String>> {
    let stdout = run(dir, &["tag", "--list"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Resolve the remote's default branch (e.g. `origin/main`) symbolically.
///
/// If `refs/remotes/origin/HEAD` is not set locally, it is queried from the
/// remote first.
pub fn default_branch(dir: &Path) -> Result<String> {
    let head_ref = format!("refs/remotes/{}/HEAD", DEFAULT_REMOTE);
    match run(dir, &["symbolic-ref", "--short", head_ref.as_str()]) {
        Ok(branch) => Ok(branch),
        Err(_) => {
            run(dir, &["remote", "set-head", DEFAULT_REMOTE, "--auto"])?;
            run(dir, &["symbolic-ref", "--short", head_ref.as_str()])
        }
    }
}

/// Check out `reference` without attaching HEAD to a branch.
///
/// The checkout is not forced: local changes that would be overwritten make
/// it fail and leave the working copy untouched.
pub fn checkout_detached(dir: &Path, reference: &str) -> Result<()> {
    run(dir, &["checkout", "--quiet", "--detach", reference]).map(drop)
}

/// Commit id of HEAD in `dir`.
pub fn head_commit(dir: &Path) -> Result<String> {
    run(dir, &["rev-parse", "HEAD"])
}

/// Tag pointing exactly at HEAD in `dir`, if any.
pub fn tag_at_head(dir: &Path) -> Option<String> {
    run(dir, &["describe", "--tags", "--exact-match", "HEAD"]).ok()
}

/// Stage `paths` in the project index.
pub fn add(root: &Path, paths: &[&str]) -> Result<()> {
    let mut args = vec!["add", "--"];
    args.extend_from_slice(paths);
    run(root, &args).map(drop)
}

/// Whether the index differs from HEAD for any of `paths`.
pub fn has_staged_changes(root: &Path, paths: &[&str]) -> Result<bool> {
    let mut args = vec!["diff", "--cached", "--quiet", "--"];
    args.extend_from_slice(paths);
    let output = output(root, &args)?;
    match output.status.code() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(Error::GitCommand {
            command: args.join(" "),
            dir: root.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

/// Commit only `paths` with `message`.
pub fn commit_paths(root: &Path, message: &str, paths: &[&str]) -> Result<()> {
    let mut args = vec!["commit", "--quiet", "-m", message, "--"];
    args.extend_from_slice(paths);
    run(root, &args).map(drop)
}

/// Unregister `path` and empty its working directory.
pub fn submodule_deinit(root: &Path, path: &str) -> Result<()> {
    run(root, &["submodule", "deinit", "--force", "--", path]).map(drop)
}

/// Remove `path` from the index and its section from `.gitmodules`.
pub fn rm(root: &Path, path: &str) -> Result<()> {
    run(root, &["rm", "--quiet", "--force", "--", path]).map(drop)
}
