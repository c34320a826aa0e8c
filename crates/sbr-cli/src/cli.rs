//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use sbr_core::{CheckoutOptions, DEFAULT_REVISION, Processor};

/// sbr - keep a tree of git checkouts in line with a manifest
#[derive(Parser, Debug)]
#[command(name = "sbr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by every command that runs the checkout pipeline
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutArgs {
    /// Delete checkouts that are not in the manifest
    #[arg(long)]
    pub prune: bool,

    /// Only fast-forward when pulling
    #[arg(long)]
    pub ff_only: bool,

    /// Rebase instead of merging when pulling
    #[arg(long)]
    pub rebase: bool,
}

impl From<CheckoutArgs> for CheckoutOptions {
    fn from(args: CheckoutArgs) -> Self {
        CheckoutOptions {
            prune: args.prune,
            ff_only: args.ff_only,
            rebase: args.rebase,
        }
    }
}

/// How `x` reduces the outputs; printing each one is the default
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct ProcessorArgs {
    /// Concatenate the outputs
    #[arg(long)]
    pub cat: bool,

    /// Add up the outputs as numbers
    #[arg(long)]
    pub sum: bool,

    /// Count identical outputs
    #[arg(long)]
    pub count: bool,

    /// Print a SHA-1 over the outputs
    #[arg(long)]
    pub digest: bool,
}

impl ProcessorArgs {
    pub fn processor(&self) -> Processor {
        if self.cat {
            Processor::Concatenate
        } else if self.sum {
            Processor::Sum
        } else if self.count {
            Processor::Histogram
        } else if self.digest {
            Processor::Digest
        } else {
            Processor::Print
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Make the checkouts on disk match the manifest
    ///
    /// Pulls the workspace root, clones missing checkouts, switches
    /// branches and remotes, optionally prunes undeclared checkouts,
    /// pulls the rest and prints the workspace version.
    Checkout {
        #[command(flatten)]
        options: CheckoutArgs,

        /// Show what would change without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Output the dry-run plan as JSON
        #[arg(long, requires = "dry_run")]
        json: bool,
    },

    /// Print the workspace version
    Version {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show how the disk differs from the manifest
    Diff {
        /// Record the differences in the manifest
        #[arg(long)]
        apply: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Record the checkouts on disk in the manifest (same as `diff --apply`)
    Write,

    /// Rewrite the manifest in canonical form
    Format,

    /// Run a command in every checkout
    ///
    /// Examples:
    ///   sbr x git status --short
    ///   sbr x --count git rev-parse --abbrev-ref HEAD
    ///   sbr x --sum -- sh -c "git ls-files | wc -l"
    #[command(name = "x")]
    Exec {
        #[command(flatten)]
        processor: ProcessorArgs,

        /// Command and arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show commits ahead of and behind a revision in every checkout
    Status {
        /// Revision to compare against
        #[arg(default_value = DEFAULT_REVISION)]
        revision: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Clone a workspace and check out its manifest
    Clone {
        /// Remote of the workspace root
        remote: String,

        /// Directory to clone into (defaults to the remote's name)
        path: Option<String>,

        /// Branch of the workspace root
        #[arg(short, long, default_value = "master")]
        branch: String,

        #[command(flatten)]
        options: CheckoutArgs,
    },
}
