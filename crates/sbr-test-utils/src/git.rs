//! Real git fixtures built with the `git` CLI.
//!
//! Every helper panics with the captured stderr when git fails, so a broken
//! fixture shows up as a readable test failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run `git <args>` in `dir` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits with a failure status.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure a throwaway identity so commits work on CI machines.
pub fn configure_identity(path: &Path) {
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
}

/// Initialise a repository at `path` with one commit on `branch`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn repo_with_commit(path: &Path, branch: &str) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("repo_with_commit: failed to create {}: {e}", path.display()));
    git(path, &["init"]);
    configure_identity(path);
    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("repo_with_commit: failed to write README.md: {e}"));
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    git(path, &["branch", "-M", branch]);
}

/// Create a bare remote named `<name>.git` under `dir`.
///
/// The first entry of `branches` holds the initial commit and becomes the
/// remote's default branch; the remaining entries are created from it.
///
/// # Panics
/// Panics if `branches` is empty or any git operation fails.
pub fn remote_with_commit(dir: &Path, name: &str, branches: &[&str]) -> PathBuf {
    let (first, rest) = branches
        .split_first()
        .expect("remote_with_commit: at least one branch is required");

    let source = dir.join(format!("{name}-source"));
    repo_with_commit(&source, first);
    for branch in rest {
        git(&source, &["branch", branch]);
    }

    let bare = dir.join(format!("{name}.git"));
    git(
        dir,
        &[
            "clone",
            "--bare",
            source.to_str().expect("utf-8 path"),
            bare.to_str().expect("utf-8 path"),
        ],
    );
    bare
}

/// Clone `remote` at `branch` into `parent/rel` and configure an identity.
pub fn clone_checkout(parent: &Path, rel: &str, remote: &Path, branch: &str) -> PathBuf {
    git(
        parent,
        &["clone", "-b", branch, remote.to_str().expect("utf-8 path"), rel],
    );
    let path = parent.join(rel);
    configure_identity(&path);
    path
}

/// Write `file` in `repo`, commit it and return the new HEAD.
pub fn commit_file(repo: &Path, file: &str, content: &str) -> String {
    fs::write(repo.join(file), content)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {file}: {e}"));
    git(repo, &["add", file]);
    git(repo, &["commit", "-m", &format!("Update {file}")]);
    head(repo)
}

/// Current HEAD commit id of `repo`.
pub fn head(repo: &Path) -> String {
    git(repo, &["rev-parse", "HEAD"])
}

/// Push the current branch of `repo` to its upstream.
pub fn push(repo: &Path) {
    git(repo, &["push"]);
}
