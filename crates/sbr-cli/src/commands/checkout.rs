//! Checkout command implementation

use std::path::Path;

use colored::Colorize;
use sbr_core::{CheckoutOptions, Diff, Workspace};

use super::open_workspace;
use crate::error::Result;

/// Run the checkout command
pub async fn run_checkout(path: &Path, options: CheckoutOptions, dry_run: bool, json: bool) -> Result<()> {
    let mut workspace = open_workspace(path)?;

    if dry_run {
        let plan = workspace.plan().await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print_plan(&workspace, &plan);
        }
        return Ok(());
    }

    checkout(&mut workspace, options).await
}

/// Run the pipeline with progress on stdout, failing on any collected error.
pub async fn checkout(workspace: &mut Workspace, options: CheckoutOptions) -> Result<()> {
    println!(
        "{} {}",
        "=>".blue().bold(),
        workspace.root().display().to_string().yellow()
    );

    let report = workspace.checkout(options, &mut std::io::stdout()).await?;

    if let Some(error) = report.error() {
        return Err(error.into());
    }

    println!(
        "{} {} cloned, {} changed, {} pulled, {} pruned",
        "OK".green().bold(),
        report.cloned,
        report.changed,
        report.pulled,
        report.pruned
    );
    Ok(())
}

fn print_plan(workspace: &Workspace, plan: &Diff) {
    if plan.is_empty() {
        println!(
            "{} Nothing to do. Checkouts match the manifest.",
            "OK".green().bold()
        );
        return;
    }

    println!(
        "{} {}",
        "Plan".blue().bold(),
        workspace.root().display().to_string().yellow()
    );
    println!();

    for record in &plan.deletions {
        println!("  {:<8}{}", "PRUNE".red(), record);
    }
    for record in &plan.insertions {
        println!("  {:<8}{}", "CLONE".green(), record);
    }
    for delta in &plan.updates {
        println!("  {:<8}{}", "CHANGED".yellow(), delta);
    }

    println!();
    println!("Run {} to apply.", "sbr checkout".cyan());
}
