//! Tests for the git adapter against real repositories.
//!
//! These tests require a `git` binary on PATH.

use std::fs;
use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;
use sbr_git::{Error, Git, GitCli, PullOptions};
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "`git {:?}` failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialise a repository with one commit on `branch`.
fn repo_with_commit(path: &Path, branch: &str) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    fs::write(path.join("README.md"), "# Test").unwrap();
    git(path, &["add", "README.md"]);
    git(path, &["commit", "-m", "Initial commit"]);
    git(path, &["branch", "-M", branch]);
}

#[tokio::test]
async fn current_branch_follows_checkout() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");
    let adapter = GitCli::new();

    assert_eq!(adapter.current_branch(temp.path()).await.unwrap(), "master");

    git(temp.path(), &["checkout", "-b", "feature"]);
    assert_eq!(adapter.current_branch(temp.path()).await.unwrap(), "feature");
}

#[tokio::test]
async fn detached_head_reports_head() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");
    git(temp.path(), &["checkout", "--detach"]);

    let branch = GitCli::new().current_branch(temp.path()).await.unwrap();
    assert_eq!(branch, "HEAD");
}

#[tokio::test]
async fn missing_origin_is_an_error() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");

    let result = GitCli::new().remote_origin_url(temp.path()).await;
    assert!(matches!(result, Err(Error::RemoteNotFound { .. })));
}

#[tokio::test]
async fn set_remote_origin_creates_then_updates() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");
    let adapter = GitCli::new();

    adapter
        .set_remote_origin(temp.path(), "git@host:first.git")
        .await
        .unwrap();
    assert_eq!(
        adapter.remote_origin_url(temp.path()).await.unwrap(),
        "git@host:first.git"
    );

    adapter
        .set_remote_origin(temp.path(), "git@host:second.git")
        .await
        .unwrap();
    assert_eq!(
        adapter.remote_origin_url(temp.path()).await.unwrap(),
        "git@host:second.git"
    );
}

#[tokio::test]
async fn branch_exists_only_sees_local_branches() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");
    let adapter = GitCli::new();

    assert!(adapter.branch_exists(temp.path(), "master").await.unwrap());
    assert!(!adapter.branch_exists(temp.path(), "dev").await.unwrap());
}

#[tokio::test]
async fn checkout_branch_creates_and_switches() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");
    let adapter = GitCli::new();

    adapter
        .checkout_branch(temp.path(), "dev", true)
        .await
        .unwrap();
    assert_eq!(adapter.current_branch(temp.path()).await.unwrap(), "dev");
    assert!(adapter.branch_exists(temp.path(), "dev").await.unwrap());

    adapter
        .checkout_branch(temp.path(), "master", false)
        .await
        .unwrap();
    assert_eq!(adapter.current_branch(temp.path()).await.unwrap(), "master");
}

#[tokio::test]
async fn checkout_of_unknown_branch_fails_with_output() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");

    let err = GitCli::new()
        .checkout_branch(temp.path(), "does-not-exist", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CommandFailed { .. }));
    assert!(err.output().is_some());
}

#[tokio::test]
async fn head_commit_matches_rev_parse() {
    let temp = TempDir::new().unwrap();
    repo_with_commit(temp.path(), "master");

    let head = GitCli::new().head_commit(temp.path()).await.unwrap();
    assert_eq!(head, git(temp.path(), &["rev-parse", "HEAD"]));
    assert_eq!(head.len(), 40);
}

#[tokio::test]
async fn clone_then_pull_and_count() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    repo_with_commit(&source, "dev");
    let workspace = temp.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    let adapter = GitCli::new();

    adapter
        .clone_repo(&workspace, "libs/a", source.to_str().unwrap(), "dev")
        .await
        .unwrap();
    let checkout = workspace.join("libs/a");
    assert_eq!(adapter.current_branch(&checkout).await.unwrap(), "dev");
    assert_eq!(
        adapter.remote_origin_url(&checkout).await.unwrap(),
        source.to_str().unwrap()
    );

    // New upstream commit: one behind, then pulled level
    fs::write(source.join("CHANGELOG.md"), "v2").unwrap();
    git(&source, &["add", "CHANGELOG.md"]);
    git(&source, &["commit", "-m", "Second commit"]);
    git(&checkout, &["fetch"]);
    assert_eq!(
        adapter.rev_list_count(&checkout, "origin/dev").await.unwrap(),
        (0, 1)
    );

    let options = PullOptions {
        ff_only: true,
        rebase: false,
    };
    adapter.pull(&checkout, options).await.unwrap();
    assert_eq!(
        adapter.rev_list_count(&checkout, "origin/dev").await.unwrap(),
        (0, 0)
    );
    assert_eq!(
        adapter.head_commit(&checkout).await.unwrap(),
        git(&source, &["rev-parse", "HEAD"])
    );
}

#[tokio::test]
async fn clone_of_missing_remote_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nowhere");

    let result = GitCli::new()
        .clone_repo(temp.path(), "libs/x", missing.to_str().unwrap(), "master")
        .await;
    assert!(matches!(result, Err(Error::CommandFailed { .. })));
    assert!(!temp.path().join("libs/x").exists());
}

#[tokio::test]
async fn head_commit_outside_repository_fails() {
    let temp = TempDir::new().unwrap();

    let result = GitCli::new().head_commit(temp.path()).await;
    assert!(matches!(result, Err(Error::Git(_))));
}

#[tokio::test]
async fn option_like_remote_is_treated_as_a_url() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    repo_with_commit(&source, "master");
    let marker = temp.path().join("marker");
    let remote = format!(
        "--upload-pack=touch {}; git-upload-pack",
        marker.display()
    );

    let result = GitCli::new()
        .clone_repo(temp.path(), "libs/x", &remote, "master")
        .await;
    assert!(matches!(result, Err(Error::CommandFailed { .. })));
    assert!(!marker.exists());
    assert!(!temp.path().join("libs/x").exists());
}

#[tokio::test]
async fn option_like_rel_is_treated_as_a_path() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    repo_with_commit(&source, "master");

    GitCli::new()
        .clone_repo(temp.path(), "-dash", source.to_str().unwrap(), "master")
        .await
        .unwrap();
    assert!(temp.path().join("-dash/README.md").is_file());
}

#[tokio::test]
async fn option_like_branch_is_refused_before_running_git() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    repo_with_commit(&source, "master");
    let adapter = GitCli::new();

    let clone = adapter
        .clone_repo(temp.path(), "libs/x", source.to_str().unwrap(), "--bare")
        .await;
    assert!(matches!(clone, Err(Error::InvalidBranch { .. })));
    assert!(!temp.path().join("libs/x").exists());

    let checkout = adapter.checkout_branch(&source, "-f", true).await;
    assert!(matches!(checkout, Err(Error::InvalidBranch { .. })));
    assert_eq!(adapter.current_branch(&source).await.unwrap(), "master");
}
