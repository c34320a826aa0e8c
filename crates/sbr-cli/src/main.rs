//! sbr CLI
//!
//! Keeps a tree of git checkouts in line with the manifest at its root.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

/// Environment variable holding the log filter when `--verbose` is not given.
const LOG_ENV: &str = "SBR_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(cmd) = cli.command else {
        println!("{} workspace manager", "sbr".green().bold());
        println!();
        println!("Run {} for available commands.", "sbr --help".cyan());
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(cmd))
}

fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    if let Err(e) = result {
        eprintln!("{}: cannot install logger: {e}", "warning".yellow().bold());
    }
    tracing::debug!("Verbose mode enabled");
}

async fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Checkout {
            options,
            dry_run,
            json,
        } => commands::run_checkout(&cwd, options.into(), dry_run, json).await,
        Commands::Version { json } => commands::run_version(&cwd, json).await,
        Commands::Diff { apply, json } => commands::run_diff(&cwd, apply, json).await,
        Commands::Write => commands::run_diff(&cwd, true, false).await,
        Commands::Format => commands::run_format(&cwd),
        Commands::Exec { processor, command } => {
            commands::run_exec(&cwd, processor.processor(), &command).await
        }
        Commands::Status { revision, json } => commands::run_status(&cwd, &revision, json).await,
        Commands::Clone {
            remote,
            path,
            branch,
            options,
        } => commands::run_clone(&cwd, &remote, path.as_deref(), &branch, options.into()).await,
    }
}
