//! Workspace facade: one root, one manifest, one git adapter

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sbr_fs::{CONFIG_FILE, MANIFEST_FILE, io};
use sbr_git::Git;
use tracing::{debug, info};

use crate::checkout::{CheckoutOptions, CheckoutReport, Checkouter};
use crate::config::Settings;
use crate::error::Result;
use crate::exec::{self, Execution};
use crate::manifest;
use crate::patch::patch;
use crate::reconcile::{self, Diff};
use crate::record::{Record, RecordSet};
use crate::scanner;
use crate::status::{self, StatusReport};
use crate::version::{self, WorkspaceVersion};

/// A workspace rooted at a directory holding the manifest.
///
/// The disk and manifest record sets are read lazily and cached; writing the
/// manifest drops the manifest cache and a checkout drops both.
pub struct Workspace {
    root: PathBuf,
    settings: Settings,
    git: Arc<dyn Git>,
    disk: Option<RecordSet>,
    declared: Option<RecordSet>,
}

impl Workspace {
    /// Workspace at `root` with default settings. `root` is used as given.
    pub fn new(root: impl Into<PathBuf>, git: Arc<dyn Git>) -> Self {
        Self::with_settings(root, Settings::default(), git)
    }

    pub fn with_settings(root: impl Into<PathBuf>, settings: Settings, git: Arc<dyn Git>) -> Self {
        Self {
            root: root.into(),
            settings,
            git,
            disk: None,
            declared: None,
        }
    }

    /// Workspace at `root` with settings from its `sbr.toml`, if any.
    pub fn open(root: impl Into<PathBuf>, git: Arc<dyn Git>) -> Result<Self> {
        let root = root.into();
        let settings = Settings::load(&root)?;
        Ok(Self::with_settings(root, settings, git))
    }

    /// Find the workspace containing `start` by walking upward.
    ///
    /// A directory qualifies if it holds the default manifest or a
    /// `sbr.toml`.
    pub fn discover(start: &Path, git: Arc<dyn Git>) -> Result<Self> {
        let root = match sbr_fs::find_workspace_root(start, MANIFEST_FILE) {
            Ok(root) => root,
            Err(manifest_err) => sbr_fs::find_workspace_root(start, CONFIG_FILE)
                .map_err(|_| manifest_err)?,
        };
        info!(root = %root.display(), "Opened workspace");
        Self::open(root, git)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn git(&self) -> Arc<dyn Git> {
        Arc::clone(&self.git)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.settings.manifest)
    }

    /// Drop both cached record sets.
    pub fn invalidate(&mut self) {
        self.disk = None;
        self.declared = None;
    }

    /// Records for the checkouts on disk.
    pub async fn scan(&mut self) -> Result<RecordSet> {
        if let Some(records) = &self.disk {
            return Ok(records.clone());
        }
        let records = scanner::scan(&self.root, self.git.as_ref()).await?;
        self.disk = Some(records.clone());
        Ok(records)
    }

    /// Records declared in the manifest.
    pub fn read_manifest(&mut self) -> Result<RecordSet> {
        if let Some(records) = &self.declared {
            return Ok(records.clone());
        }
        let path = self.manifest_path();
        debug!(path = %path.display(), "Reading manifest");
        let records = manifest::parse(&io::read_text(&path)?)?;
        self.declared = Some(records.clone());
        Ok(records)
    }

    /// Replace the manifest with the canonical form of `records`.
    pub fn write_manifest(&mut self, records: &[Record]) -> Result<()> {
        let path = self.manifest_path();
        io::write_atomic(&path, manifest::serialize(records).as_bytes())?;
        self.declared = None;
        info!(path = %path.display(), count = records.len(), "Wrote manifest");
        Ok(())
    }

    /// Rewrite the manifest in canonical form. Returns the record count.
    pub fn format_manifest(&mut self) -> Result<usize> {
        let records = self.read_manifest()?;
        self.write_manifest(&records)?;
        Ok(records.len())
    }

    /// What checkout would do: the changes from disk to manifest.
    pub async fn plan(&mut self) -> Result<Diff> {
        let disk = self.scan().await?;
        let declared = self.read_manifest()?;
        Ok(reconcile::diff(&disk, &declared))
    }

    /// How the disk has drifted from the manifest.
    pub async fn changes(&mut self) -> Result<Diff> {
        let disk = self.scan().await?;
        let declared = self.read_manifest()?;
        Ok(reconcile::diff(&declared, &disk))
    }

    /// Record the disk's drift in the manifest. Returns the applied changes.
    pub async fn write_from_disk(&mut self) -> Result<Diff> {
        let declared = self.read_manifest()?;
        let changes = self.changes().await?;
        if !changes.is_empty() {
            let patched = patch(&declared, &changes)?;
            self.write_manifest(&patched)?;
        }
        Ok(changes)
    }

    /// Converge the disk on the manifest.
    pub async fn checkout(
        &mut self,
        options: CheckoutOptions,
        out: &mut dyn Write,
    ) -> Result<CheckoutReport> {
        let options = self.settings.checkout.merge(options);
        let report = Checkouter::new(self, options).run(out).await;
        self.invalidate();
        report
    }

    /// Digest of every checkout's HEAD, the root included.
    pub async fn version(&self) -> Result<WorkspaceVersion> {
        let paths = scanner::checkout_paths(&self.root)?;
        Ok(version::compute(self.git.as_ref(), &paths).await)
    }

    /// Ahead/behind counts of every checkout against `revision`.
    pub async fn status(&self, revision: &str) -> Result<StatusReport> {
        let paths = scanner::checkout_paths(&self.root)?;
        status::status(self.git.as_ref(), &self.root, &paths, revision).await
    }

    /// Run `command` in every checkout.
    pub async fn exec(&self, command: &str, args: &[String]) -> Result<Vec<Execution>> {
        let paths = scanner::checkout_paths(&self.root)?;
        exec::run_all(&self.root, &paths, command, args).await
    }
}
