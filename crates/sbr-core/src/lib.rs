//! Reconciliation engine for the sbr workspace manager
//!
//! A workspace is a directory tree of git checkouts described by a manifest
//! file at its root. This crate reads and writes that manifest, scans the
//! tree for checkouts, computes differences between the two, and drives
//! the checkout pipeline that makes the disk match the manifest.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sbr_core::{CheckoutOptions, Workspace};
//! use sbr_git::GitCli;
//!
//! # async fn run() -> sbr_core::Result<()> {
//! let mut workspace = Workspace::discover(std::path::Path::new("."), Arc::new(GitCli::new()))?;
//! let report = workspace
//!     .checkout(CheckoutOptions::default(), &mut std::io::stdout())
//!     .await?;
//! println!("{:?}", report.digest());
//! # Ok(())
//! # }
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod patch;
pub mod reconcile;
pub mod record;
pub mod scanner;
pub mod status;
pub mod version;
pub mod workspace;

pub use checkout::{CheckoutOptions, CheckoutReport, Checkouter, Stage};
pub use config::Settings;
pub use error::{Error, Result};
pub use exec::{Execution, ExecutionProcessor, Processor};
pub use manifest::DEFAULT_BRANCH;
pub use patch::patch;
pub use reconcile::{Diff, diff};
pub use record::{Delta, Record, RecordSet};
pub use status::{CheckoutStatus, DEFAULT_REVISION, StatusReport};
pub use version::WorkspaceVersion;
pub use workspace::Workspace;
