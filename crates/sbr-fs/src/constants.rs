//! Well-known file names inside a workspace.

/// Default manifest file name, relative to the workspace root.
pub const MANIFEST_FILE: &str = ".sbr";

/// Optional workspace configuration file, relative to the workspace root.
pub const CONFIG_FILE: &str = "sbr.toml";

/// Directory marking the root of a git checkout.
pub const GIT_DIR: &str = ".git";
