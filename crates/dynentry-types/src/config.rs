//! Loader configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Manifest file names probed in each mod directory, in priority order.
pub const DEFAULT_MANIFEST_FILES: &[&str] = &["fabric.mod.json", "mod.toml"];

/// Configuration for manifest discovery, read from `~/.dynentry/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory whose subdirectories each hold one mod.
    pub mods_dir: PathBuf,
    /// Manifest file names to look for, first match wins.
    pub manifest_files: Vec<String>,
    /// Treat invalid manifests and duplicate ids as errors instead of skipping them.
    pub strict: bool,
    /// Mod ids to leave out of the registry.
    pub disabled_mods: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mods_dir: mods_dir_under(dirs::home_dir()),
            manifest_files: DEFAULT_MANIFEST_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strict: false,
            disabled_mods: Vec::new(),
        }
    }
}

impl LoaderConfig {
    pub fn is_disabled(&self, mod_id: &str) -> bool {
        self.disabled_mods.iter().any(|d| d == mod_id)
    }
}

/// `~/.dynentry`, or `./.dynentry` when no home directory is known.
pub fn dynentry_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dynentry")
}

/// `<home>/.dynentry/mods`, or `./mods` without a home directory.
fn mods_dir_under(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(".dynentry").join("mods"),
        None => PathBuf::from("mods"),
    }
}
