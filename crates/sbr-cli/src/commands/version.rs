//! Version command implementation

use std::path::Path;

use colored::Colorize;

use super::open_workspace;
use crate::error::Result;

/// Run the version command
///
/// Prints the digest even when some checkouts could not be read, then fails.
pub async fn run_version(path: &Path, json: bool) -> Result<()> {
    let workspace = open_workspace(path)?;
    let version = workspace.version().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&version)?);
    } else {
        println!("{}", version.digest);
        for failure in &version.failures {
            eprintln!("  {} {}", "!".red(), failure);
        }
    }

    match version.error() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}
