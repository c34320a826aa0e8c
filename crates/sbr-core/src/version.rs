//! Workspace version digest

use std::path::{Path, PathBuf};

use sbr_git::Git;
use serde::Serialize;
use sha1::{Digest, Sha1};
use tracing::warn;

use crate::error::Error;

/// SHA-1 over the HEAD commits of every checkout, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceVersion {
    /// Lowercase hex digest.
    pub digest: String,
    /// Checkouts whose HEAD could not be read; they do not contribute.
    pub failures: Vec<String>,
}

impl WorkspaceVersion {
    /// True when every checkout contributed to the digest.
    pub fn is_reliable(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn error(&self) -> Option<Error> {
        (!self.failures.is_empty()).then(|| Error::Version {
            count: self.failures.len(),
        })
    }
}

/// Digest the HEAD commits of `paths`.
///
/// Paths are sorted by their full path so the result does not depend on the
/// order they are given in. Failures are collected, not fatal.
pub async fn compute(git: &dyn Git, paths: &[PathBuf]) -> WorkspaceVersion {
    let mut sorted: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    sorted.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut hasher = Sha1::new();
    let mut failures = Vec::new();

    for path in sorted {
        match git.head_commit(path).await {
            Ok(commit) => hasher.update(commit.as_bytes()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read HEAD");
                failures.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    WorkspaceVersion {
        digest: format!("{:x}", hasher.finalize()),
        failures,
    }
}
