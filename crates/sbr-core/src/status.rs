//! Ahead/behind counts per checkout

use std::path::{Path, PathBuf};

use sbr_git::Git;
use serde::Serialize;

use crate::error::Result;
use crate::scanner;

/// Revision compared against when none is given.
pub const DEFAULT_REVISION: &str = "origin/master";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutStatus {
    pub rel: String,
    /// Commits on HEAD not on the revision.
    pub ahead: u32,
    /// Commits on the revision not on HEAD.
    pub behind: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub checkouts: Vec<CheckoutStatus>,
    /// Checkouts that could not be compared, with the reason.
    pub failures: Vec<(String, String)>,
}

impl StatusReport {
    pub fn total_ahead(&self) -> u64 {
        self.checkouts.iter().map(|c| u64::from(c.ahead)).sum()
    }

    pub fn total_behind(&self) -> u64 {
        self.checkouts.iter().map(|c| u64::from(c.behind)).sum()
    }
}

/// Compare every checkout in `paths` against `revision`.
pub async fn status(
    git: &dyn Git,
    root: &Path,
    paths: &[PathBuf],
    revision: &str,
) -> Result<StatusReport> {
    let mut report = StatusReport::default();
    for path in paths {
        let rel = scanner::rel_path(root, path)?;
        match git.rev_list_count(path, revision).await {
            Ok((ahead, behind)) => report.checkouts.push(CheckoutStatus { rel, ahead, behind }),
            Err(e) => report.failures.push((rel, e.to_string())),
        }
    }
    Ok(report)
}
