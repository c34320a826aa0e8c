//! Checkout scenarios against real git remotes.
//!
//! Every test builds a [`TestWorkspace`] (a root cloned from a bare remote)
//! and drives [`Workspace`] through the command-line git adapter.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use sbr_core::{CheckoutOptions, CheckoutReport, Error, Workspace};
use sbr_git::{Git, GitCli};
use sbr_test_utils::{TestWorkspace, git};
use sha1::{Digest, Sha1};

fn open(ws: &TestWorkspace) -> Workspace {
    Workspace::new(ws.root(), Arc::new(GitCli::new()))
}

async fn checkout(ws: &TestWorkspace, options: CheckoutOptions) -> (CheckoutReport, String) {
    let mut out = Vec::new();
    let report = open(ws)
        .checkout(options, &mut out)
        .await
        .unwrap_or_else(|e| panic!("checkout failed: {e}\n{}", String::from_utf8_lossy(&out)));
    (report, String::from_utf8(out).unwrap())
}

fn manifest_line(rel: &str, remote: &std::path::Path) -> String {
    format!("\"{rel}\" \"{}\"\n", remote.display())
}

#[tokio::test]
async fn clone_only_convergence() {
    let ws = TestWorkspace::new();
    let a = ws.remote("a", &["master"]);
    let b = ws.remote("b", &["master", "dev"]);
    ws.write_manifest(&format!(
        "{}\"dev\"\n{}",
        manifest_line("libs/a", &a),
        manifest_line("libs/b", &b)
    ));

    let (report, out) = checkout(&ws, CheckoutOptions::default()).await;

    assert_eq!(report.cloned, 2, "{out}");
    assert!(report.failures.is_empty(), "{out}");
    ws.assert_exists("libs/a/README.md");
    ws.assert_exists("libs/b/README.md");

    let expected = Sha1::digest(format!("{}{}{}", ws.head("."), ws.head("libs/a"), ws.head("libs/b")));
    assert_eq!(report.digest(), Some(format!("{expected:x}").as_str()));

    let git = GitCli::new();
    assert_eq!(git.current_branch(&ws.root().join("libs/b")).await.unwrap(), "dev");
    assert!(open(&ws).plan().await.unwrap().is_empty());
}

#[tokio::test]
async fn prune_dry_run_then_prune() {
    let ws = TestWorkspace::new();
    let c = ws.remote("c", &["master"]);
    ws.checkout("libs/c", &c, "master");
    ws.write_manifest("");

    let (dry, out) = checkout(&ws, CheckoutOptions::default()).await;
    assert_eq!(dry.would_prune, 1);
    assert!(out.contains("Would Prune libs/c"), "{out}");
    ws.assert_exists("libs/c");

    let prune = CheckoutOptions {
        prune: true,
        ..Default::default()
    };
    let (real, _) = checkout(&ws, prune).await;
    assert_eq!(real.pruned, 1);
    ws.assert_not_exists("libs/c");
}

#[tokio::test]
async fn branch_migration_switches_branch_only() {
    let ws = TestWorkspace::new();
    let a = ws.remote("a", &["master", "dev"]);
    let path = ws.checkout("libs/a", &a, "dev");
    ws.write_manifest(&manifest_line("libs/a", &a));

    let (report, out) = checkout(&ws, CheckoutOptions::default()).await;

    assert_eq!(report.changed, 1, "{out}");
    let git = GitCli::new();
    assert_eq!(git.current_branch(&path).await.unwrap(), "master");
    assert_eq!(
        git.remote_origin_url(&path).await.unwrap(),
        a.display().to_string()
    );
}

#[tokio::test]
async fn remote_change_repoints_origin() {
    let ws = TestWorkspace::new();
    let old = ws.remote("old", &["master"]);
    let new = ws.remote("new", &["master"]);
    let path = ws.checkout("lib", &old, "master");
    ws.write_manifest(&manifest_line("lib", &new));

    let (report, out) = checkout(&ws, CheckoutOptions::default()).await;

    assert_eq!(report.changed, 1, "{out}");
    assert_eq!(
        GitCli::new().remote_origin_url(&path).await.unwrap(),
        new.display().to_string()
    );
}

#[tokio::test]
async fn existing_checkouts_are_pulled() {
    let ws = TestWorkspace::new();
    let a = ws.remote("a", &["master"]);
    ws.checkout("a", &a, "master");
    ws.write_manifest(&manifest_line("a", &a));

    let staging = tempfile::TempDir::new().unwrap();
    let other = git::clone_checkout(staging.path(), "other", &a, "master");
    let pushed = git::commit_file(&other, "CHANGES.md", "new");
    git::push(&other);

    let (report, _) = checkout(&ws, CheckoutOptions {
        ff_only: true,
        ..Default::default()
    })
    .await;

    assert_eq!(report.pulled, 1);
    assert_eq!(ws.head("a"), pushed);
}

#[tokio::test]
async fn version_matches_checkout_digest() {
    let ws = TestWorkspace::new();
    let a = ws.remote("a", &["master"]);
    ws.write_manifest(&manifest_line("a", &a));

    let (report, _) = checkout(&ws, CheckoutOptions::default()).await;
    let version = open(&ws).version().await.unwrap();

    assert!(version.is_reliable());
    assert_eq!(report.digest(), Some(version.digest.as_str()));
}

#[tokio::test]
async fn unreachable_root_aborts_checkout() {
    let ws = TestWorkspace::new();
    let a = ws.remote("a", &["master"]);
    ws.write_manifest(&manifest_line("a", &a));
    git::git(ws.root(), &["remote", "set-url", "origin", "/nonexistent/root.git"]);

    let mut out = Vec::new();
    let result = open(&ws).checkout(CheckoutOptions::default(), &mut out).await;

    assert!(matches!(result, Err(Error::RootPull { .. })));
    ws.assert_not_exists("a");
}

#[tokio::test]
async fn failed_clone_is_collected_and_siblings_finish() {
    let ws = TestWorkspace::new();
    let a = ws.remote("a", &["master"]);
    ws.write_manifest(&format!(
        "{}\"missing\" \"/nonexistent/missing.git\"\n",
        manifest_line("a", &a)
    ));

    let (report, out) = checkout(&ws, CheckoutOptions::default()).await;

    assert_eq!(report.cloned, 1, "{out}");
    assert_eq!(report.failures.len(), 1, "{out}");
    assert!(out.contains("ERR  Cloning into 'missing'"), "{out}");
    assert!(matches!(report.error(), Some(Error::Operations { count: 1 })));
    ws.assert_exists("a/README.md");
}
