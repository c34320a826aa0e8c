//! Git adapter for the sbr workspace manager
//!
//! The reconciliation engine never talks to git directly; it goes through the
//! [`Git`] trait. [`GitCli`] is the production implementation: mutating
//! operations shell out to the `git` binary, read-only interrogation uses
//! `git2`.

pub mod adapter;
pub mod cli;
pub mod error;

pub use adapter::{Git, PullOptions};
pub use cli::GitCli;
pub use error::{Error, Result};
