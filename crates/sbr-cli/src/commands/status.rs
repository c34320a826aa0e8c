//! Status command implementation

use std::path::Path;

use colored::Colorize;
use sbr_core::StatusReport;

use super::open_workspace;
use crate::error::{CliError, Result};

/// Run the status command
pub async fn run_status(path: &Path, revision: &str, json: bool) -> Result<()> {
    let workspace = open_workspace(path)?;
    let report = workspace.status(revision).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_status(revision, &report);
    }

    if !report.failures.is_empty() {
        return Err(CliError::user(format!(
            "{} checkout(s) could not be compared with {revision}",
            report.failures.len()
        )));
    }
    Ok(())
}

fn print_status(revision: &str, report: &StatusReport) {
    println!("{} {}", "Status against".blue().bold(), revision.cyan());
    println!();
    println!("  {:>6} {:>6}  {}", "AHEAD", "BEHIND", "PATH");

    for checkout in &report.checkouts {
        let line = format!(
            "  {:>6} {:>6}  {}",
            checkout.ahead, checkout.behind, checkout.rel
        );
        if checkout.ahead == 0 && checkout.behind == 0 {
            println!("{line}");
        } else {
            println!("{}", line.yellow());
        }
    }
    for (rel, error) in &report.failures {
        println!("  {} {}: {}", "ERR".red().bold(), rel, error);
    }

    println!(
        "  {:>6} {:>6}  {}",
        report.total_ahead(),
        report.total_behind(),
        "Total".bold()
    );
}
