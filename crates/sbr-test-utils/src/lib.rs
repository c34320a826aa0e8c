//! Shared test utilities for the sbr workspace.
//!
//! Fixtures used across crate test suites. Dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`fake`]: [`FakeGit`], an in-memory git adapter that records calls
//! - [`git`]: real git fixtures (remotes, checkouts, commits)
//! - [`workspace`]: [`TestWorkspace`] builder for end-to-end scenarios

pub mod fake;
pub mod git;
pub mod workspace;

pub use fake::{Call, FakeCheckout, FakeGit, Op};
pub use workspace::TestWorkspace;
