//! Mod manifest parsing and validation.
//!
//! Handles `fabric.mod.json` and `mod.toml` manifests. Both deserialize into
//! the same [`ModMetadata`]; the file extension picks the format.

use crate::{LoaderError, LoaderResult};
use dynentry_types::ModMetadata;
use std::path::Path;

/// Maximum length of a mod id.
const MAX_ID_LEN: usize = 64;

/// Parse a manifest file, choosing the format from its extension.
pub fn parse_manifest(path: &Path) -> LoaderResult<ModMetadata> {
    let content = std::fs::read_to_string(path)?;
    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json_str(&content),
        Some("toml") => parse_toml_str(&content),
        other => Err(format!("unsupported manifest format: {}", other.unwrap_or("<none>"))),
    };
    parsed.map_err(|reason| LoaderError::ManifestParse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse a JSON (`fabric.mod.json`) manifest.
pub fn parse_json_str(content: &str) -> Result<ModMetadata, String> {
    serde_json::from_str(content).map_err(|e| e.to_string())
}

/// Parse a TOML (`mod.toml`) manifest.
pub fn parse_toml_str(content: &str) -> Result<ModMetadata, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// Check a manifest for problems. Returns an empty list when valid.
pub fn validate(meta: &ModMetadata) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(problem) = check_mod_id(&meta.id) {
        problems.push(problem);
    }

    for (category, entries) in &meta.entrypoints {
        if category.trim().is_empty() {
            problems.push("entrypoint category name is empty".to_string());
        }
        for entry in entries {
            if let Err(problem) = check_class_name(entry.value()) {
                problems.push(format!("entrypoint '{category}': {problem}"));
            }
        }
    }

    problems
}

fn check_mod_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("mod id is empty".to_string());
    }
    if id.len() < 2 || id.len() > MAX_ID_LEN {
        return Err(format!(
            "mod id '{id}' must be between 2 and {MAX_ID_LEN} characters"
        ));
    }
    if !id.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(format!("mod id '{id}' must start with a lowercase letter"));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
    {
        return Err(format!("mod id '{id}' contains invalid character '{bad}'"));
    }
    Ok(())
}

fn check_class_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("class name is empty".to_string());
    }
    if name.chars().any(char::is_whitespace) {
        return Err(format!("class name '{name}' contains whitespace"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(format!("class name '{name}' has an empty segment"));
    }
    Ok(())
}
