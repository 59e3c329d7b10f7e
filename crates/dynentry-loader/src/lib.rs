//! Mod manifest discovery for dynentry.
//!
//! This crate provides:
//! - **Manifest parsing**: `fabric.mod.json` (JSON) and `mod.toml` (TOML) into
//!   [`ModMetadata`](dynentry_types::ModMetadata)
//! - **Validation**: mod id and entrypoint class name checks
//! - **Discovery**: [`ManifestModRegistry`] scans a mods directory and
//!   implements [`ModRegistry`](dynentry_types::ModRegistry)
//! - **Config**: loads [`LoaderConfig`](dynentry_types::config::LoaderConfig)
//!   from `~/.dynentry/config.toml`

pub mod config;
pub mod discovery;
pub mod manifest;

pub use discovery::ManifestModRegistry;

use std::path::PathBuf;

// ─── Error types ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Failed to parse manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },
    #[error("Invalid manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },
    #[error("Duplicate mod id '{id}' in {first} and {second}")]
    DuplicateMod {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Mods directory not found: {0}")]
    ModsDirMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoaderResult<T> = Result<T, LoaderError>;
