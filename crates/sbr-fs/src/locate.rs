//! Workspace root discovery

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Walk upward from `start` until a directory containing `manifest` is found.
///
/// The starting point is canonicalized first so that relative paths and
/// symlinked working directories resolve to a stable root.
pub fn find_workspace_root(start: &Path, manifest: &str) -> Result<PathBuf> {
    let start = dunce::canonicalize(start).map_err(|e| Error::io(start, e))?;

    for dir in start.ancestors() {
        if dir.join(manifest).is_file() {
            tracing::debug!(root = %dir.display(), "Found workspace root");
            return Ok(dir.to_path_buf());
        }
    }

    Err(Error::NotAWorkspace {
        start,
        manifest: manifest.to_string(),
    })
}
