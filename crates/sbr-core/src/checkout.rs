//! Checkout pipeline
//!
//! Converges the workspace on its manifest in five stages:
//!
//! 1. pull the workspace root (a failure aborts everything)
//! 2. scan the disk and diff it against the manifest
//! 3. apply the diff: branch/remote changes, then clones and prunes
//!    concurrently
//! 4. pull every checkout that was not just cloned
//! 5. compute the workspace version
//!
//! Per-subrepository failures are collected in the [`CheckoutReport`] and
//! never stop sibling work.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sbr_git::{Git, PullOptions};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::reconcile::{self, Diff};
use crate::record::{Delta, Record};
use crate::scanner;
use crate::version::{self, WorkspaceVersion};
use crate::workspace::Workspace;

/// Options for a checkout run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckoutOptions {
    /// Delete checkouts that are not in the manifest.
    pub prune: bool,
    /// Pass `--ff-only` to every pull.
    pub ff_only: bool,
    /// Pass `--rebase` to every pull.
    pub rebase: bool,
}

impl CheckoutOptions {
    pub fn pull_options(&self) -> PullOptions {
        PullOptions {
            ff_only: self.ff_only,
            rebase: self.rebase,
        }
    }

    /// Union of two option sets; a flag set in either is set.
    pub fn merge(self, other: Self) -> Self {
        Self {
            prune: self.prune || other.prune,
            ff_only: self.ff_only || other.ff_only,
            rebase: self.rebase || other.rebase,
        }
    }
}

/// Pipeline position. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    PullingRoot,
    Reconciling,
    ApplyingDiff,
    PullingRest,
    ComputingVersion,
    Done,
}

/// Outcome of a checkout run that was not aborted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckoutReport {
    pub cloned: usize,
    pub pruned: usize,
    pub would_prune: usize,
    pub changed: usize,
    pub pulled: usize,
    /// One entry per failed subrepository operation.
    pub failures: Vec<String>,
    pub version: Option<WorkspaceVersion>,
}

impl CheckoutReport {
    pub fn digest(&self) -> Option<&str> {
        self.version.as_ref().map(|v| v.digest.as_str())
    }

    /// Aggregate error if anything failed.
    pub fn error(&self) -> Option<Error> {
        (!self.failures.is_empty()).then(|| Error::Operations {
            count: self.failures.len(),
        })
    }
}

enum Outcome {
    Cloned {
        record: Record,
        result: sbr_git::Result<String>,
    },
    Pruned {
        record: Record,
        result: std::io::Result<()>,
    },
}

/// Runs the checkout pipeline against one workspace.
pub struct Checkouter<'w> {
    workspace: &'w mut Workspace,
    options: CheckoutOptions,
    stage: Stage,
}

impl<'w> Checkouter<'w> {
    pub fn new(workspace: &'w mut Workspace, options: CheckoutOptions) -> Self {
        Self {
            workspace,
            options,
            stage: Stage::Idle,
        }
    }

    /// Run every stage, writing progress lines to `out`.
    ///
    /// Returns `Err` only when the run was aborted: the root pull failed, a
    /// scan failed, the manifest could not be read, or a clone destination is
    /// occupied by a file. Everything else lands in the report.
    pub async fn run(&mut self, out: &mut dyn Write) -> Result<CheckoutReport> {
        let git = self.workspace.git();
        let root = self.workspace.root().to_path_buf();
        let pull = self.options.pull_options();
        let mut report = CheckoutReport::default();

        self.enter(Stage::PullingRoot);
        match git.pull(&root, pull).await {
            Ok(_) => writeln!(out, "     Pulling '/'...")?,
            Err(source) => {
                writeln!(out, "ERR  Pulling '/'   : {source}")?;
                return Err(Error::RootPull { source });
            }
        }

        self.enter(Stage::Reconciling);
        self.workspace.invalidate();
        let disk = self.workspace.scan().await?;
        let manifest = self.workspace.read_manifest()?;
        let diff = reconcile::diff(&disk, &manifest);
        debug!(
            insertions = diff.insertions.len(),
            deletions = diff.deletions.len(),
            updates = diff.updates.len(),
            "Reconciled disk against manifest"
        );

        self.enter(Stage::ApplyingDiff);
        let mut skip = self.apply(&git, &root, &diff, out, &mut report).await?;
        self.workspace.invalidate();

        self.enter(Stage::PullingRest);
        let paths = scanner::checkout_paths(&root)?;
        skip.insert(root.clone());
        pull_all(&git, &root, &paths, &skip, pull, out, &mut report).await?;

        self.enter(Stage::ComputingVersion);
        let version = version::compute(git.as_ref(), &paths).await;
        writeln!(out, "Workspace Version {}", version.digest)?;
        for failure in &version.failures {
            writeln!(out, "ERR  Getting Version   : {failure}")?;
        }
        report.failures.extend(version.failures.iter().cloned());
        report.version = Some(version);

        self.enter(Stage::Done);
        Ok(report)
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {next:?} after {:?}", self.stage);
        info!(from = ?self.stage, to = ?next, "Checkout stage");
        self.stage = next;
    }

    /// Stage 3. Returns the paths that were freshly cloned.
    async fn apply(
        &self,
        git: &Arc<dyn Git>,
        root: &Path,
        diff: &Diff,
        out: &mut dyn Write,
        report: &mut CheckoutReport,
    ) -> Result<HashSet<PathBuf>> {
        for record in &diff.insertions {
            let destination = root.join(record.rel());
            if destination.exists() && !destination.is_dir() {
                return Err(Error::DestinationIsFile {
                    rel: record.rel().to_string(),
                });
            }
        }

        for delta in &diff.updates {
            match change(git.as_ref(), root, delta).await {
                Ok(true) => {
                    writeln!(out, "     Changing {delta}")?;
                    report.changed += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    writeln!(out, "ERR  Changing '{}'   : {e}", delta.rel())?;
                    report.failures.push(format!("change {}: {e}", delta.rel()));
                }
            }
        }

        let mut tasks = JoinSet::new();

        for record in &diff.insertions {
            if root.join(record.rel()).is_dir() {
                info!(rel = record.rel(), "Destination already exists, not cloning");
                continue;
            }
            let git = Arc::clone(git);
            let root = root.to_path_buf();
            let record = record.clone();
            tasks.spawn(async move {
                let result = git
                    .clone_repo(&root, record.rel(), record.remote(), record.branch())
                    .await;
                Outcome::Cloned { record, result }
            });
        }

        if self.options.prune {
            for record in &diff.deletions {
                let path = root.join(record.rel());
                let record = record.clone();
                tasks.spawn(async move {
                    let result = prune(&path).await;
                    Outcome::Pruned { record, result }
                });
            }
        }

        let mut cloned = HashSet::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Outcome::Cloned {
                    record,
                    result: Ok(_),
                }) => {
                    writeln!(out, "     Cloning into '{}'...", record.rel())?;
                    report.cloned += 1;
                    cloned.insert(root.join(record.rel()));
                }
                Ok(Outcome::Cloned {
                    record,
                    result: Err(e),
                }) => {
                    writeln!(out, "ERR  Cloning into '{}'   : {e}", record.rel())?;
                    report.failures.push(format!("clone {}: {e}", record.rel()));
                }
                Ok(Outcome::Pruned {
                    record,
                    result: Ok(()),
                }) => {
                    writeln!(out, "     Pruning '{}'...", record.rel())?;
                    report.pruned += 1;
                }
                Ok(Outcome::Pruned {
                    record,
                    result: Err(e),
                }) => {
                    writeln!(out, "ERR  Pruning '{}'   : {e}", record.rel())?;
                    report.failures.push(format!("prune {}: {e}", record.rel()));
                }
                Err(e) => {
                    warn!(error = %e, "Checkout task did not complete");
                    writeln!(out, "ERR  Task   : {e}")?;
                    report.failures.push(e.to_string());
                }
            }
        }

        if !self.options.prune {
            for record in &diff.deletions {
                writeln!(out, "     Would Prune {record}")?;
                report.would_prune += 1;
            }
        }

        if !diff.is_empty() {
            let (pruned, label) = if self.options.prune {
                (report.pruned, "PRUNE")
            } else {
                (report.would_prune, "REQUIRED PRUNE")
            };
            writeln!(
                out,
                "{} CLONE, {pruned} {label} {} CHANGED",
                report.cloned, report.changed
            )?;
        }

        Ok(cloned)
    }
}

/// Switch branch, then remote. Stops at the first failing sub-step.
async fn change(git: &dyn Git, root: &Path, delta: &Delta) -> sbr_git::Result<bool> {
    let path = root.join(delta.rel());
    let mut changed = false;

    let branch = delta.new.branch();
    if git.current_branch(&path).await? != branch {
        let exists = git.branch_exists(&path, branch).await?;
        git.checkout_branch(&path, branch, !exists).await?;
        changed = true;
    }

    let remote = delta.new.remote();
    if git.remote_origin_url(&path).await? != remote {
        git.set_remote_origin(&path, remote).await?;
        changed = true;
    }

    Ok(changed)
}

/// Remove a checkout. A path already gone (e.g. nested in another pruned
/// checkout) counts as removed.
async fn prune(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Stage 4: pull every checkout path not in `skip`, concurrently.
async fn pull_all(
    git: &Arc<dyn Git>,
    root: &Path,
    paths: &[PathBuf],
    skip: &HashSet<PathBuf>,
    options: PullOptions,
    out: &mut dyn Write,
    report: &mut CheckoutReport,
) -> Result<()> {
    let mut tasks = JoinSet::new();
    for path in paths.iter().filter(|p| !skip.contains(*p)) {
        let git = Arc::clone(git);
        let path = path.clone();
        tasks.spawn(async move {
            let result = git.pull(&path, options).await;
            (path, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(_))) => {
                writeln!(out, "     Pulling '{}'...", scanner::rel_path(root, &path)?)?;
                report.pulled += 1;
            }
            Ok((path, Err(e))) => {
                let rel = scanner::rel_path(root, &path)?;
                writeln!(out, "ERR  Pulling '{rel}'   : {e}")?;
                report.failures.push(format!("pull {rel}: {e}"));
            }
            Err(e) => {
                warn!(error = %e, "Pull task did not complete");
                writeln!(out, "ERR  Task   : {e}")?;
                report.failures.push(e.to_string());
            }
        }
    }
    Ok(())
}
