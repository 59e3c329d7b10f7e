//! Mod discovery: scans a mods directory into a [`ModRegistry`].
//!
//! Each immediate subdirectory of the mods directory is one mod. The first
//! manifest file from `LoaderConfig::manifest_files` present in it is parsed;
//! directories without any are skipped. Subdirectories are visited in sorted
//! name order so the registry's enumeration order is stable across platforms.

use crate::manifest;
use crate::{LoaderError, LoaderResult};
use dynentry_types::config::LoaderConfig;
use dynentry_types::{EntrypointMetadata, ModContainer, ModMetadata, ModRegistry};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A mod found on disk.
#[derive(Debug, Clone)]
pub struct DiscoveredMod {
    /// Parsed manifest.
    pub metadata: ModMetadata,
    /// Manifest file the metadata came from, if any.
    pub manifest_path: Option<PathBuf>,
}

/// Mods discovered from manifests, in discovery order.
#[derive(Debug, Default)]
pub struct ManifestModRegistry {
    mods: Vec<DiscoveredMod>,
}

impl ManifestModRegistry {
    /// Registry over already-parsed metadata, in the given order.
    pub fn from_mods(mods: Vec<ModMetadata>) -> Self {
        Self {
            mods: mods
                .into_iter()
                .map(|metadata| DiscoveredMod {
                    metadata,
                    manifest_path: None,
                })
                .collect(),
        }
    }

    /// Scan `config.mods_dir`.
    ///
    /// In strict mode unparsable or invalid manifests, duplicate ids and a
    /// missing mods directory are errors. Otherwise they are logged and
    /// skipped, and the first mod with a given id wins.
    pub fn discover(config: &LoaderConfig) -> LoaderResult<Self> {
        let mods_dir = &config.mods_dir;
        info!(path = %mods_dir.display(), "Discovering mods");

        if !mods_dir.is_dir() {
            if config.strict {
                return Err(LoaderError::ModsDirMissing(mods_dir.clone()));
            }
            debug!(path = %mods_dir.display(), "Mods directory does not exist");
            return Ok(Self::default());
        }

        let mut registry = Self::default();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for manifest_path in manifest_paths(config)? {
            let metadata = match manifest::parse_manifest(&manifest_path) {
                Ok(metadata) => metadata,
                Err(e) if config.strict => return Err(e),
                Err(e) => {
                    warn!("Skipping mod: {e}");
                    continue;
                }
            };

            let problems = manifest::validate(&metadata);
            if !problems.is_empty() {
                let reason = problems.join("; ");
                if config.strict {
                    return Err(LoaderError::InvalidManifest {
                        path: manifest_path,
                        reason,
                    });
                }
                warn!(path = %manifest_path.display(), "Skipping invalid manifest: {reason}");
                continue;
            }

            if config.is_disabled(&metadata.id) {
                info!(mod_id = %metadata.id, "Mod disabled by config");
                continue;
            }

            if let Some(first) = seen.get(&metadata.id) {
                if config.strict {
                    return Err(LoaderError::DuplicateMod {
                        id: metadata.id,
                        first: first.clone(),
                        second: manifest_path,
                    });
                }
                warn!(
                    mod_id = %metadata.id,
                    kept = %first.display(),
                    ignored = %manifest_path.display(),
                    "Duplicate mod id"
                );
                continue;
            }

            debug!(mod_id = %metadata.id, path = %manifest_path.display(), "Discovered mod");
            seen.insert(metadata.id.clone(), manifest_path.clone());
            registry.mods.push(DiscoveredMod {
                metadata,
                manifest_path: Some(manifest_path),
            });
        }

        info!("Discovered {} mod(s)", registry.len());
        Ok(registry)
    }

    /// Look up a mod by id.
    pub fn get(&self, id: &str) -> Option<&DiscoveredMod> {
        self.mods.iter().find(|m| m.metadata.id == id)
    }

    /// All mods, in discovery order.
    pub fn mods(&self) -> &[DiscoveredMod] {
        &self.mods
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Every category declared by at least one mod, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.mods
            .iter()
            .flat_map(|m| m.metadata.categories())
            .map(String::from)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(mod id, declaration)` pairs for `category`, in enumeration order.
    pub fn declarations(&self, category: &str) -> Vec<(&str, &EntrypointMetadata)> {
        self.mods
            .iter()
            .flat_map(|m| {
                m.metadata
                    .entrypoints(category)
                    .iter()
                    .map(move |e| (m.metadata.id.as_str(), e))
            })
            .collect()
    }
}

impl ModRegistry for ManifestModRegistry {
    fn all_mods(&self) -> Vec<&dyn ModContainer> {
        self.mods
            .iter()
            .map(|m| &m.metadata as &dyn ModContainer)
            .collect()
    }
}

/// Result of checking one manifest without loading it into a registry.
#[derive(Debug, Clone)]
pub struct ManifestCheck {
    pub manifest_path: PathBuf,
    /// The mod id, when the manifest parsed.
    pub mod_id: Option<String>,
    /// Parse, validation and duplicate-id problems. Empty when the manifest is fine.
    pub problems: Vec<String>,
}

impl ManifestCheck {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check every manifest under `config.mods_dir`, collecting all problems
/// instead of stopping at the first one.
pub fn check_manifests(config: &LoaderConfig) -> LoaderResult<Vec<ManifestCheck>> {
    if !config.mods_dir.is_dir() {
        return Err(LoaderError::ModsDirMissing(config.mods_dir.clone()));
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut checks = Vec::new();

    for manifest_path in manifest_paths(config)? {
        let check = match manifest::parse_manifest(&manifest_path) {
            Ok(metadata) => {
                let mut problems = manifest::validate(&metadata);
                if let Some(first) = seen.get(&metadata.id) {
                    problems.push(format!(
                        "duplicate mod id '{}' (already declared in {})",
                        metadata.id,
                        first.display()
                    ));
                } else {
                    seen.insert(metadata.id.clone(), manifest_path.clone());
                }
                ManifestCheck {
                    manifest_path,
                    mod_id: Some(metadata.id),
                    problems,
                }
            }
            Err(LoaderError::ManifestParse { reason, .. }) => ManifestCheck {
                manifest_path,
                mod_id: None,
                problems: vec![reason],
            },
            Err(e) => return Err(e),
        };
        checks.push(check);
    }

    Ok(checks)
}

/// Manifest file of every mod directory under `config.mods_dir`, in sorted
/// directory order.
fn manifest_paths(config: &LoaderConfig) -> LoaderResult<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&config.mods_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    Ok(dirs
        .into_iter()
        .filter_map(|dir| {
            let found = find_manifest(&dir, &config.manifest_files);
            if found.is_none() {
                debug!(path = %dir.display(), "No manifest found, skipping");
            }
            found
        })
        .collect())
}

fn find_manifest(dir: &Path, names: &[String]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
