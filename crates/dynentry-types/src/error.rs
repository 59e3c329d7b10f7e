//! Error types for entrypoint resolution and execution.

use std::fmt;
use thiserror::Error;

/// Boxed error carried as the cause of a failed construction.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a resolved class has no usable zero-argument constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unconstructible {
    /// The class declares no zero-argument constructor.
    NoDefaultConstructor,
    /// A zero-argument constructor exists but is not accessible.
    Inaccessible,
    /// The class is abstract and cannot be instantiated.
    Abstract,
}

impl fmt::Display for Unconstructible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultConstructor => write!(f, "no zero-argument constructor"),
            Self::Inaccessible => write!(f, "constructor is not accessible"),
            Self::Abstract => write!(f, "class is abstract"),
        }
    }
}

/// Failure of a `load`, `execute` or `maybe_execute` call.
///
/// The first failure aborts the whole call; nothing is aggregated across mods.
#[derive(Error, Debug)]
pub enum EntrypointError {
    /// A declared class name does not exist in the running class registry.
    #[error("class {class_name} specified in the {category} entrypoint of mod {mod_name} does not exist")]
    Unresolved {
        category: String,
        class_name: String,
        mod_name: String,
    },

    /// The class resolved but cannot be instantiated.
    #[error("class {class_name} specified in the {category} entrypoint of mod {mod_name} cannot be instantiated: {reason}")]
    NotConstructible {
        category: String,
        class_name: String,
        mod_name: String,
        reason: Unconstructible,
    },

    /// The constructor itself failed.
    #[error("an error was encountered during the instantiation of the {category} entrypoint class {class_name}")]
    ExecutionFailed {
        category: String,
        class_name: String,
        mod_name: String,
        #[source]
        source: BoxError,
    },

    /// The instance does not implement the requested capability type.
    #[error("class {class_name} specified in the {category} entrypoint of mod {mod_name} does not implement {capability}")]
    IncompatibleType {
        category: String,
        class_name: String,
        mod_name: String,
        capability: &'static str,
    },
}

impl EntrypointError {
    /// The entrypoint category being processed.
    pub fn category(&self) -> &str {
        match self {
            Self::Unresolved { category, .. }
            | Self::NotConstructible { category, .. }
            | Self::ExecutionFailed { category, .. }
            | Self::IncompatibleType { category, .. } => category,
        }
    }

    /// The declared class name that failed.
    pub fn class_name(&self) -> &str {
        match self {
            Self::Unresolved { class_name, .. }
            | Self::NotConstructible { class_name, .. }
            | Self::ExecutionFailed { class_name, .. }
            | Self::IncompatibleType { class_name, .. } => class_name,
        }
    }

    /// Display name of the mod that declared the class.
    pub fn mod_name(&self) -> &str {
        match self {
            Self::Unresolved { mod_name, .. }
            | Self::NotConstructible { mod_name, .. }
            | Self::ExecutionFailed { mod_name, .. }
            | Self::IncompatibleType { mod_name, .. } => mod_name,
        }
    }
}

/// Alias for Result with EntrypointError.
pub type EntrypointResult<T> = Result<T, EntrypointError>;
