//! Clone command implementation

use std::path::Path;

use colored::Colorize;
use sbr_core::CheckoutOptions;
use sbr_git::{Git, GitCli};

use super::checkout::checkout;
use super::open_workspace;
use crate::error::{CliError, Result};

/// Clone the workspace root at `remote`, then check out its manifest
pub async fn run_clone(
    cwd: &Path,
    remote: &str,
    path: Option<&str>,
    branch: &str,
    options: CheckoutOptions,
) -> Result<()> {
    let rel = match path {
        Some(path) => path.to_string(),
        None => directory_name(remote)
            .ok_or_else(|| CliError::user(format!("cannot derive a directory name from '{remote}'")))?,
    };

    let destination = cwd.join(&rel);
    if destination.exists() {
        return Err(CliError::user(format!(
            "destination '{}' already exists",
            destination.display()
        )));
    }

    println!("     Cloning into '{rel}'...");
    GitCli::new().clone_repo(cwd, &rel, remote, branch).await?;

    let mut workspace = open_workspace(&destination)?;
    checkout(&mut workspace, options).await?;

    println!(
        "{} Workspace ready at {}",
        "OK".green().bold(),
        destination.display()
    );
    Ok(())
}

/// Last path component of a remote URL without a `.git` suffix.
fn directory_name(remote: &str) -> Option<String> {
    let trimmed = remote.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}
