//! Format command implementation

use std::path::Path;

use colored::Colorize;

use super::open_workspace;
use crate::error::Result;

/// Rewrite the manifest in canonical form
pub fn run_format(path: &Path) -> Result<()> {
    let mut workspace = open_workspace(path)?;
    let count = workspace.format_manifest()?;

    println!(
        "{} Formatted {} ({} records)",
        "OK".green().bold(),
        workspace.manifest_path().display(),
        count
    );
    Ok(())
}
