//! Entrypoint declarations.
//!
//! A mod declares entrypoints as a list of class names under a category
//! (`"main"`, `"client"`, or any name a host chooses). Each entry is either a
//! bare class name or a table naming the language adapter as well:
//!
//! ```toml
//! [entrypoints]
//! main = ["net.example.ExampleMod", { adapter = "kotlin", value = "net.example.KtInit" }]
//! ```

use serde::{Deserialize, Serialize};

/// Adapter name used when an entry does not specify one.
pub const DEFAULT_ADAPTER: &str = "default";

/// A single `(adapter, class name)` declaration under an entrypoint category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntrypoint")]
pub struct EntrypointMetadata {
    /// Language adapter that owns the class. Carried as metadata only.
    pub adapter: String,
    /// Fully-qualified class name.
    pub value: String,
}

impl EntrypointMetadata {
    /// Declaration using the default adapter.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            adapter: DEFAULT_ADAPTER.to_string(),
            value: value.into(),
        }
    }

    /// Declaration using an explicit adapter.
    pub fn with_adapter(adapter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    pub fn is_default_adapter(&self) -> bool {
        self.adapter == DEFAULT_ADAPTER
    }
}

/// On-disk shape: either `"a.b.C"` or `{ adapter = "...", value = "a.b.C" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntrypoint {
    Bare(String),
    Full {
        #[serde(default = "default_adapter")]
        adapter: String,
        value: String,
    },
}

fn default_adapter() -> String {
    DEFAULT_ADAPTER.to_string()
}

impl From<RawEntrypoint> for EntrypointMetadata {
    fn from(raw: RawEntrypoint) -> Self {
        match raw {
            RawEntrypoint::Bare(value) => Self::new(value),
            RawEntrypoint::Full { adapter, value } => Self { adapter, value },
        }
    }
}
