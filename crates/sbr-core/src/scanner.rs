//! Discover checkouts on disk

use std::path::{Component, Path, PathBuf};

use sbr_fs::GIT_DIR;
use sbr_git::Git;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::record::{Record, RecordSet};

/// Rel used for the workspace root itself.
pub const ROOT_REL: &str = ".";

/// Every directory under `root` (including `root`) that holds a `.git` directory.
///
/// Entries are visited in file-name order. `.git` directories are not
/// descended into; the checkouts that own them are, so nested checkouts are
/// found.
pub fn checkout_paths(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| Error::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_dir() && entry.file_name() == GIT_DIR {
            if let Some(parent) = entry.path().parent() {
                paths.push(parent.to_path_buf());
            }
            walker.skip_current_dir();
        }
    }

    Ok(paths)
}

/// `path` relative to `root`, with `/` separators; `.` for the root itself.
pub fn rel_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| Error::OutsideWorkspace {
        path: path.to_path_buf(),
    })?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        Ok(ROOT_REL.to_string())
    } else {
        Ok(parts.join("/"))
    }
}

/// Build the disk record set for the workspace at `root`.
///
/// The root checkout is not part of the set. Any checkout that cannot report
/// its branch or origin fails the whole scan.
#[instrument(skip(git), level = "debug")]
pub async fn scan(root: &Path, git: &dyn Git) -> Result<RecordSet> {
    let mut records = RecordSet::new();

    for path in checkout_paths(root)? {
        let rel = rel_path(root, &path)?;
        if rel == ROOT_REL {
            continue;
        }

        let branch = git
            .current_branch(&path)
            .await
            .map_err(|source| Error::Scan {
                path: path.clone(),
                source,
            })?;
        let remote = git
            .remote_origin_url(&path)
            .await
            .map_err(|source| Error::Scan {
                path: path.clone(),
                source,
            })?;

        debug!(%rel, %remote, %branch, "Found checkout");
        records.push(Record::new(rel, remote, branch));
    }

    records.sort();
    Ok(records)
}
