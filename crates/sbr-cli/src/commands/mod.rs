//! Command implementations for sbr-cli

pub mod checkout;
pub mod clone;
pub mod diff;
pub mod exec;
pub mod format;
pub mod status;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use sbr_core::Workspace;
use sbr_git::GitCli;

use crate::error::Result;

pub use checkout::run_checkout;
pub use clone::run_clone;
pub use diff::run_diff;
pub use exec::run_exec;
pub use format::run_format;
pub use status::run_status;
pub use version::run_version;

/// Open the workspace containing `path`, backed by the git command line.
pub fn open_workspace(path: &Path) -> Result<Workspace> {
    Ok(Workspace::discover(path, Arc::new(GitCli::new()))?)
}
