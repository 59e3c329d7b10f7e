//! Mod metadata and the collaborator traits consumed by the executors.
//!
//! The executors never discover mods themselves. They are handed a
//! [`ModRegistry`] that enumerates [`ModContainer`]s in the host's own order,
//! and they preserve that order in every callback sequence.

use crate::entrypoint::EntrypointMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A loaded mod, as seen by the entrypoint executors.
pub trait ModContainer {
    /// Unique mod identifier.
    fn id(&self) -> &str;

    /// Human-readable name, used in error messages.
    fn name(&self) -> &str;

    /// Entrypoints declared under `category`, in declaration order.
    fn entrypoints(&self, category: &str) -> &[EntrypointMetadata];
}

/// Source of the loaded mods.
pub trait ModRegistry {
    /// All loaded mods, in the host's enumeration order.
    fn all_mods(&self) -> Vec<&dyn ModContainer>;
}

impl<R: ModRegistry + ?Sized> ModRegistry for &R {
    fn all_mods(&self) -> Vec<&dyn ModContainer> {
        (**self).all_mods()
    }
}

impl ModRegistry for [ModMetadata] {
    fn all_mods(&self) -> Vec<&dyn ModContainer> {
        self.iter().map(|m| m as &dyn ModContainer).collect()
    }
}

impl ModRegistry for Vec<ModMetadata> {
    fn all_mods(&self) -> Vec<&dyn ModContainer> {
        self.as_slice().all_mods()
    }
}

/// Declarative mod metadata, as read from a `fabric.mod.json` or `mod.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModMetadata {
    /// Unique mod identifier (e.g. `"examplemod"`).
    pub id: String,
    /// Display name. Falls back to `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Entrypoint declarations keyed by category.
    #[serde(default)]
    pub entrypoints: BTreeMap<String, Vec<EntrypointMetadata>>,
}

impl ModMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a default-adapter declaration under `category`.
    pub fn entrypoint(mut self, category: impl Into<String>, class_name: impl Into<String>) -> Self {
        self.entrypoints
            .entry(category.into())
            .or_default()
            .push(EntrypointMetadata::new(class_name));
        self
    }

    /// Names of all categories this mod declares entrypoints for.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entrypoints.keys().map(String::as_str)
    }
}

impl ModContainer for ModMetadata {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn entrypoints(&self, category: &str) -> &[EntrypointMetadata] {
        self.entrypoints
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
