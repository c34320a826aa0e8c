//! The collaborator contract consumed by the reconciliation engine

use std::path::Path;

use async_trait::async_trait;

use crate::Result;

/// Flags forwarded to `git pull`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullOptions {
    /// Refuse to merge unless the pull can be resolved as a fast-forward.
    pub ff_only: bool,
    /// Rebase instead of merge.
    pub rebase: bool,
}

/// Operations the engine needs from a version-control backend.
///
/// Every path is the absolute path of a checkout root. Implementations must be
/// shareable across tasks: the orchestrator holds one behind an `Arc` and
/// calls it from concurrently running tasks on disjoint paths.
#[async_trait]
pub trait Git: Send + Sync {
    /// Name of the branch checked out at `path` (`"HEAD"` when detached).
    async fn current_branch(&self, path: &Path) -> Result<String>;

    /// URL configured for the `origin` remote.
    async fn remote_origin_url(&self, path: &Path) -> Result<String>;

    /// Clone `remote` at `branch` into `parent/rel`.
    ///
    /// Returns the process output.
    async fn clone_repo(&self, parent: &Path, rel: &str, remote: &str, branch: &str)
    -> Result<String>;

    /// Pull the current branch from its upstream.
    ///
    /// Returns the process output.
    async fn pull(&self, path: &Path, options: PullOptions) -> Result<String>;

    /// Whether a local branch named `branch` exists.
    async fn branch_exists(&self, path: &Path, branch: &str) -> Result<bool>;

    /// Check out `branch`, creating it from the current HEAD when `create` is set.
    async fn checkout_branch(&self, path: &Path, branch: &str, create: bool) -> Result<()>;

    /// Point the `origin` remote at `url`.
    async fn set_remote_origin(&self, path: &Path, url: &str) -> Result<()>;

    /// Full hex id of the commit HEAD resolves to.
    async fn head_commit(&self, path: &Path) -> Result<String>;

    /// Commits only in HEAD and only in `revision`, as `(left, right)`.
    async fn rev_list_count(&self, path: &Path, revision: &str) -> Result<(u32, u32)>;
}
