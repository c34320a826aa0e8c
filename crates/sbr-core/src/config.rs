//! Workspace settings read from `sbr.toml`

use std::path::Path;

use sbr_fs::{CONFIG_FILE, ConfigStore, MANIFEST_FILE};
use serde::{Deserialize, Serialize};

use crate::checkout::CheckoutOptions;
use crate::error::Result;

/// Optional per-workspace settings.
///
/// ```toml
/// manifest = ".sbr"
///
/// [checkout]
/// prune = false
/// ff_only = true
/// rebase = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Manifest file name, relative to the workspace root.
    pub manifest: String,
    /// Defaults for `checkout`; command-line flags can only turn these on.
    pub checkout: CheckoutOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest: MANIFEST_FILE.to_string(),
            checkout: CheckoutOptions::default(),
        }
    }
}

impl Settings {
    /// Load `sbr.toml` from `root`, or defaults if there is none.
    pub fn load(root: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(&root.join(CONFIG_FILE))?)
    }
}
