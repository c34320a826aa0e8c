//! [`TestWorkspace`] builder for end-to-end scenarios backed by real git.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// A temporary workspace root cloned from a bare remote, plus a directory
/// holding the bare remotes that subrepositories are cloned from.
///
/// # Example
///
/// ```rust,no_run
/// use sbr_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let remote = ws.remote("a", &["master"]);
/// ws.write_manifest(&format!("\"libs/a\" \"{}\"\n", remote.display()));
/// ws.assert_not_exists("libs/a");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create a workspace root whose `origin` is a fresh bare remote on `master`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("TestWorkspace::new: failed to create temp dir");
        let remotes = temp_dir.path().join("remotes");
        fs::create_dir_all(&remotes).expect("TestWorkspace::new: failed to create remotes dir");

        let root_remote = git::remote_with_commit(&remotes, "root", &["master"]);
        let root = git::clone_checkout(temp_dir.path(), "ws", &root_remote, "master");

        Self { temp_dir, root }
    }

    /// Return the workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a bare remote `<name>.git` carrying `branches`.
    pub fn remote(&self, name: &str, branches: &[&str]) -> PathBuf {
        git::remote_with_commit(&self.temp_dir.path().join("remotes"), name, branches)
    }

    /// Clone `remote` at `branch` into the workspace at `rel`.
    pub fn checkout(&self, rel: &str, remote: &Path, branch: &str) -> PathBuf {
        git::clone_checkout(&self.root, rel, remote, branch)
    }

    /// Write the manifest file at the workspace root.
    pub fn write_manifest(&self, content: &str) {
        fs::write(self.root.join(".sbr"), content)
            .expect("TestWorkspace::write_manifest: failed to write .sbr");
    }

    /// Read the manifest file at the workspace root.
    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.root.join(".sbr"))
            .expect("TestWorkspace::read_manifest: failed to read .sbr")
    }

    /// HEAD commit of the checkout at `rel` (`"."` for the root).
    pub fn head(&self, rel: &str) -> String {
        git::head(&self.root.join(rel))
    }

    /// Assert that `rel` (relative to the workspace root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, rel: &str) {
        let full_path = self.root.join(rel);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` (relative to the workspace root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, rel: &str) {
        let full_path = self.root.join(rel);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }
}
