//! In-memory [`Git`] implementation for orchestrator tests.
//!
//! Realism level: **FAKE**. Checkouts exist as `<path>/.git` directories on
//! disk (so the tree scanner finds them) while branch, remote and HEAD live
//! in memory. Every call is recorded, and any operation can be scripted to
//! fail for a given path.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use sbr_git::{Error, Git, PullOptions, Result};

/// Adapter operation, used to script failures and inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CurrentBranch,
    RemoteOriginUrl,
    Clone,
    Pull,
    BranchExists,
    CheckoutBranch,
    SetRemoteOrigin,
    HeadCommit,
    RevListCount,
}

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub path: PathBuf,
    pub detail: String,
}

/// In-memory state of one fake checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCheckout {
    pub branch: String,
    pub remote: String,
    pub head: String,
    pub local_branches: BTreeSet<String>,
}

impl FakeCheckout {
    pub fn new(remote: &str, branch: &str, head: &str) -> Self {
        Self {
            branch: branch.to_string(),
            remote: remote.to_string(),
            head: head.to_string(),
            local_branches: BTreeSet::from([branch.to_string()]),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    checkouts: HashMap<PathBuf, FakeCheckout>,
    heads: HashMap<(String, String), String>,
    failures: HashSet<(Op, PathBuf)>,
    calls: Vec<Call>,
}

/// Scriptable fake git adapter.
#[derive(Debug, Default)]
pub struct FakeGit {
    state: Mutex<State>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checkout and create its `.git` marker directory on disk.
    pub fn add_checkout(&self, path: &Path, remote: &str, branch: &str, head: &str) {
        fs::create_dir_all(path.join(".git"))
            .unwrap_or_else(|e| panic!("FakeGit: failed to create .git in {}: {e}", path.display()));
        self.lock()
            .checkouts
            .insert(path.to_path_buf(), FakeCheckout::new(remote, branch, head));
    }

    /// Declare the commit a clone of `remote` at `branch` will check out.
    pub fn publish(&self, remote: &str, branch: &str, head: &str) {
        self.lock()
            .heads
            .insert((remote.to_string(), branch.to_string()), head.to_string());
    }

    /// Add a local branch to an existing checkout.
    pub fn add_local_branch(&self, path: &Path, branch: &str) {
        if let Some(checkout) = self.lock().checkouts.get_mut(path) {
            checkout.local_branches.insert(branch.to_string());
        }
    }

    /// Make every future `op` on `path` fail.
    pub fn fail(&self, op: Op, path: &Path) {
        self.lock().failures.insert((op, path.to_path_buf()));
    }

    /// Snapshot of a checkout's in-memory state.
    pub fn checkout(&self, path: &Path) -> Option<FakeCheckout> {
        self.lock().checkouts.get(path).cloned()
    }

    /// All recorded calls, in call order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Recorded calls of one kind.
    pub fn calls_of(&self, op: Op) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.op == op).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and apply any scripted failure.
    fn enter(&self, op: Op, path: &Path, detail: impl Into<String>) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call {
            op,
            path: path.to_path_buf(),
            detail: detail.into(),
        });
        if state.failures.contains(&(op, path.to_path_buf())) {
            return Err(Error::CommandFailed {
                command: format!("{op:?}"),
                path: path.to_path_buf(),
                output: format!("scripted failure of {op:?}"),
            });
        }
        Ok(())
    }

    fn with_checkout<T>(&self, path: &Path, f: impl FnOnce(&mut FakeCheckout) -> T) -> Result<T> {
        let mut state = self.lock();
        match state.checkouts.get_mut(path) {
            Some(checkout) => Ok(f(checkout)),
            None => Err(Error::CommandFailed {
                command: "open".into(),
                path: path.to_path_buf(),
                output: "fatal: not a git repository".into(),
            }),
        }
    }
}

#[async_trait]
impl Git for FakeGit {
    async fn current_branch(&self, path: &Path) -> Result<String> {
        self.enter(Op::CurrentBranch, path, "")?;
        self.with_checkout(path, |c| c.branch.clone())
    }

    async fn remote_origin_url(&self, path: &Path) -> Result<String> {
        self.enter(Op::RemoteOriginUrl, path, "")?;
        self.with_checkout(path, |c| c.remote.clone())
    }

    async fn clone_repo(
        &self,
        parent: &Path,
        rel: &str,
        remote: &str,
        branch: &str,
    ) -> Result<String> {
        let path = parent.join(rel);
        self.enter(Op::Clone, &path, format!("{remote} {branch}"))?;
        let head = self
            .lock()
            .heads
            .get(&(remote.to_string(), branch.to_string()))
            .cloned()
            .unwrap_or_else(|| format!("{remote}@{branch}"));
        self.add_checkout(&path, remote, branch, &head);
        Ok(format!("Cloning into '{rel}'..."))
    }

    async fn pull(&self, path: &Path, options: PullOptions) -> Result<String> {
        self.enter(
            Op::Pull,
            path,
            format!("ff_only={} rebase={}", options.ff_only, options.rebase),
        )?;
        Ok("Already up to date.".to_string())
    }

    async fn branch_exists(&self, path: &Path, branch: &str) -> Result<bool> {
        self.enter(Op::BranchExists, path, branch)?;
        self.with_checkout(path, |c| c.local_branches.contains(branch))
    }

    async fn checkout_branch(&self, path: &Path, branch: &str, create: bool) -> Result<()> {
        self.enter(Op::CheckoutBranch, path, format!("{branch} create={create}"))?;
        self.with_checkout(path, |c| {
            c.local_branches.insert(branch.to_string());
            c.branch = branch.to_string();
        })
    }

    async fn set_remote_origin(&self, path: &Path, url: &str) -> Result<()> {
        self.enter(Op::SetRemoteOrigin, path, url)?;
        self.with_checkout(path, |c| c.remote = url.to_string())
    }

    async fn head_commit(&self, path: &Path) -> Result<String> {
        self.enter(Op::HeadCommit, path, "")?;
        self.with_checkout(path, |c| c.head.clone())
    }

    async fn rev_list_count(&self, path: &Path, revision: &str) -> Result<(u32, u32)> {
        self.enter(Op::RevListCount, path, revision)?;
        self.with_checkout(path, |_| (0, 0))
    }
}
