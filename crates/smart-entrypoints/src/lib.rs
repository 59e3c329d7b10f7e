//! Smart entrypoints: optional entrypoint execution.
//!
//! An *optional* entrypoint category is one where mods may list classes that
//! only implement some of the capabilities a host knows about. The host asks
//! for one capability at a time, and classes that do not implement it are
//! skipped instead of failing the whole run.

use dynamic_entry::{ClassResolver, DynamicEntry};
use dynentry_types::{EntrypointResult, ModRegistry};
use tracing::debug;

/// Execute `on_execute` for every class declared under `category` that
/// implements `C`.
///
/// All matching classes are constructed before the first callback runs, so
/// an unresolvable name or a failing constructor anywhere in the category
/// means no callback runs at all.
pub fn execute_optional_entrypoint<C, M, R, F>(
    mods: M,
    classes: R,
    category: &str,
    on_execute: F,
) -> EntrypointResult<()>
where
    C: ?Sized + 'static,
    M: ModRegistry,
    R: ClassResolver,
    F: FnMut(Box<C>),
{
    debug!(
        category,
        capability = std::any::type_name::<C>(),
        "Executing optional entrypoint"
    );
    DynamicEntry::new(mods, classes).maybe_execute::<C, F>(category, on_execute)
}
