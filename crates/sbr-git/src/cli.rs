//! Production git adapter

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use git2::{BranchType, ErrorCode, Repository};
use tokio::process::Command;

use crate::adapter::{Git, PullOptions};
use crate::{Error, Result};

const ORIGIN: &str = "origin";

/// Characters stripped from both ends of git output.
const TRIM_CUT: [char; 3] = ['\n', ' ', '\t'];

/// Git adapter backed by the `git` binary and `git2`.
///
/// Commands that touch the network or the working tree (`clone`, `pull`,
/// `checkout`, `rev-list`) run the `git` executable so that user
/// configuration, credential helpers and hooks apply as usual. Read-only
/// lookups open the repository with `git2` on a blocking thread.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use the `git` found on `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Run `git <args>` in `dir` and return its trimmed combined output.
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        tracing::debug!(path = %dir.display(), %command, "Running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let text = text.trim_matches(TRIM_CUT).to_string();

        if output.status.success() {
            Ok(text)
        } else {
            Err(Error::CommandFailed {
                command,
                path: dir.to_path_buf(),
                output: text,
            })
        }
    }
}

/// Reject branch names that git would parse as an option.
fn branch_arg(branch: &str) -> Result<&str> {
    if branch.starts_with('-') {
        Err(Error::InvalidBranch {
            branch: branch.to_string(),
        })
    } else {
        Ok(branch)
    }
}

/// Open the repository at `path` on a blocking thread and run `f` on it.
async fn with_repo<T, F>(path: &Path, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Repository) -> Result<T> + Send + 'static,
{
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let repo = Repository::open(&path)?;
        f(&repo)
    })
    .await?
}

#[async_trait]
impl Git for GitCli {
    async fn current_branch(&self, path: &Path) -> Result<String> {
        with_repo(path, |repo| {
            let head = repo.head()?;
            if head.is_branch() {
                Ok(head.shorthand().unwrap_or("HEAD").to_string())
            } else {
                // Detached HEAD
                Ok("HEAD".to_string())
            }
        })
        .await
    }

    async fn remote_origin_url(&self, path: &Path) -> Result<String> {
        let owned = path.to_path_buf();
        with_repo(path, move |repo| {
            let remote = repo.find_remote(ORIGIN).map_err(|e| match e.code() {
                ErrorCode::NotFound => Error::RemoteNotFound { path: owned.clone() },
                _ => Error::Git(e),
            })?;
            remote
                .url()
                .map(str::to_string)
                .ok_or(Error::RemoteNotFound { path: owned })
        })
        .await
    }

    async fn clone_repo(
        &self,
        parent: &Path,
        rel: &str,
        remote: &str,
        branch: &str,
    ) -> Result<String> {
        let branch = branch_arg(branch)?;
        // Manifest fields after `--` are never options
        self.run(parent, &["clone", "-b", branch, "--", remote, rel])
            .await
    }

    async fn pull(&self, path: &Path, options: PullOptions) -> Result<String> {
        let mut args = vec!["pull"];
        if options.ff_only {
            args.push("--ff-only");
        }
        if options.rebase {
            args.push("--rebase");
        }
        self.run(path, &args).await
    }

    async fn branch_exists(&self, path: &Path, branch: &str) -> Result<bool> {
        let branch = branch.to_string();
        with_repo(path, move |repo| {
            match repo.find_branch(&branch, BranchType::Local) {
                Ok(_) => Ok(true),
                Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
                Err(e) => Err(Error::Git(e)),
            }
        })
        .await
    }

    async fn checkout_branch(&self, path: &Path, branch: &str, create: bool) -> Result<()> {
        let branch = branch_arg(branch)?;
        if create {
            self.run(path, &["checkout", "-b", branch]).await?;
        } else {
            self.run(path, &["checkout", branch, "--"]).await?;
        }
        Ok(())
    }

    async fn set_remote_origin(&self, path: &Path, url: &str) -> Result<()> {
        let url = url.to_string();
        with_repo(path, move |repo| {
            match repo.find_remote(ORIGIN) {
                Ok(_) => repo.remote_set_url(ORIGIN, &url)?,
                Err(e) if e.code() == ErrorCode::NotFound => {
                    repo.remote(ORIGIN, &url)?;
                }
                Err(e) => return Err(Error::Git(e)),
            }
            Ok(())
        })
        .await
    }

    async fn head_commit(&self, path: &Path) -> Result<String> {
        with_repo(path, |repo| {
            let commit = repo.head()?.peel_to_commit()?;
            Ok(commit.id().to_string())
        })
        .await
    }

    async fn rev_list_count(&self, path: &Path, revision: &str) -> Result<(u32, u32)> {
        let range = format!("HEAD...{revision}");
        let output = self
            .run(path, &["rev-list", "--count", "--left-right", &range])
            .await?;
        parse_left_right(&output).ok_or_else(|| Error::UnexpectedOutput {
            command: format!("rev-list --count --left-right {range}"),
            output,
        })
    }
}

/// Parse the `<left>\t<right>` output of `git rev-list --count --left-right`.
fn parse_left_right(output: &str) -> Option<(u32, u32)> {
    let mut parts = output.split_whitespace();
    let left = parts.next()?.parse().ok()?;
    let right = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((left, right))
}
