//! Configuration loading from `~/.dynentry/config.toml` with defaults.

use dynentry_types::config::{dynentry_home, LoaderConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dynentry_home().join("config.toml")
}

/// Load loader configuration from a TOML file, with defaults.
///
/// A missing, unreadable or invalid file falls back to
/// [`LoaderConfig::default`]; the reason is logged.
pub fn load_config(path: Option<&Path>) -> LoaderConfig {
    let config_path = path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        info!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        return LoaderConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<LoaderConfig>(&contents) {
            Ok(mut config) => {
                resolve_relative_mods_dir(&mut config, &config_path);
                info!(path = %config_path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %config_path.display(),
                    "Failed to parse config, using defaults"
                );
                LoaderConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to read config file, using defaults"
            );
            LoaderConfig::default()
        }
    }
}

/// A relative `mods_dir` is taken relative to the config file's directory.
fn resolve_relative_mods_dir(config: &mut LoaderConfig, config_path: &Path) {
    if config.mods_dir.is_relative() {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        config.mods_dir = base.join(&config.mods_dir);
    }
}
