//! Core types and traits for dynentry.
//!
//! This crate defines the data model shared by the entrypoint executors, the
//! manifest loader and the CLI: mod metadata, entrypoint declarations, the
//! collaborator traits the executors consume, and the error types. It contains
//! no business logic.

pub mod config;
pub mod entrypoint;
pub mod error;
pub mod mods;

pub use entrypoint::EntrypointMetadata;
pub use error::{BoxError, EntrypointError, EntrypointResult, Unconstructible};
pub use mods::{ModContainer, ModMetadata, ModRegistry};
