//! Diff command implementation
//!
//! Shows how the checkouts on disk differ from the manifest, and optionally
//! writes those differences back into the manifest.

use std::path::Path;

use colored::Colorize;
use sbr_core::Diff;

use super::open_workspace;
use crate::error::Result;

/// Run the diff command
pub async fn run_diff(path: &Path, apply: bool, json: bool) -> Result<()> {
    let mut workspace = open_workspace(path)?;

    let changes = if apply {
        workspace.write_from_disk().await?
    } else {
        workspace.changes().await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }

    print_changes(&changes);

    if apply && !changes.is_empty() {
        println!();
        println!(
            "{} Wrote {} change(s) to {}",
            "OK".green().bold(),
            changes.len(),
            workspace.manifest_path().display()
        );
    } else if !changes.is_empty() {
        println!();
        println!("Run {} to record these changes.", "sbr write".cyan());
    }

    Ok(())
}

fn print_changes(changes: &Diff) {
    if changes.is_empty() {
        println!(
            "{} No changes. The manifest matches the disk.",
            "OK".green().bold()
        );
        return;
    }

    for record in &changes.insertions {
        println!("  {} {}", "+".green(), record.to_string().green());
    }
    for record in &changes.deletions {
        println!("  {} {}", "-".red(), record.to_string().red());
    }
    for delta in &changes.updates {
        println!("  {} {}", "~".yellow(), delta.to_string().yellow());
    }
}
