//! Filesystem helpers for the sbr workspace manager
//!
//! Provides workspace root discovery, atomic manifest writes and TOML
//! configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod locate;

pub use config::ConfigStore;
pub use constants::{CONFIG_FILE, GIT_DIR, MANIFEST_FILE};
pub use error::{Error, Result};
pub use locate::find_workspace_root;
