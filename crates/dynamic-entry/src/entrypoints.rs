//! Entrypoint loading and execution.
//!
//! Every operation walks the mods in registry order and, inside each mod, the
//! declarations for the requested category in declaration order. Typed
//! execution is two-phase: all instances are constructed first, and only once
//! every declaration has succeeded are the callbacks run. A failure anywhere
//! in the first phase therefore means no execution callback runs at all.

use crate::class::{Class, ClassResolver, InstantiationError};
use dynentry_types::{
    EntrypointError, EntrypointMetadata, EntrypointResult, ModContainer, ModRegistry,
};
use std::any::type_name;
use tracing::debug;

/// Entrypoint operations over an injected mod registry and class resolver.
pub struct DynamicEntry<M, R> {
    mods: M,
    classes: R,
}

impl<M: ModRegistry, R: ClassResolver> DynamicEntry<M, R> {
    pub fn new(mods: M, classes: R) -> Self {
        Self { mods, classes }
    }

    pub fn mods(&self) -> &M {
        &self.mods
    }

    pub fn classes(&self) -> &R {
        &self.classes
    }

    /// Resolve every class declared under `category`.
    pub fn load(&self, category: &str) -> EntrypointResult<()> {
        self.load_with(category, |_| {})
    }

    /// Resolve every class declared under `category`, calling `on_load` for
    /// each as soon as it resolves.
    ///
    /// An unresolvable name stops the walk; classes already passed to
    /// `on_load` stay loaded.
    pub fn load_with<F>(&self, category: &str, mut on_load: F) -> EntrypointResult<()>
    where
        F: FnMut(&Class),
    {
        for container in self.mods.all_mods() {
            for entrypoint in container.entrypoints(category) {
                let class = self.resolve(category, container, entrypoint)?;
                on_load(&class);
            }
        }
        Ok(())
    }

    /// Construct every class declared under `category` as a `C` and pass each
    /// instance to `on_execute`.
    ///
    /// Every declared class is expected to implement `C`; one that does not
    /// fails the call with [`EntrypointError::IncompatibleType`].
    pub fn execute<C, F>(&self, category: &str, on_execute: F) -> EntrypointResult<()>
    where
        C: ?Sized + 'static,
        F: FnMut(Box<C>),
    {
        let mut instances: Vec<Box<C>> = Vec::new();
        for container in self.mods.all_mods() {
            for entrypoint in container.entrypoints(category) {
                let class = self.resolve(category, container, entrypoint)?;
                instances.push(construct::<C>(&class, category, container)?);
            }
        }
        run(category, instances, on_execute);
        Ok(())
    }

    /// Like [`execute`](Self::execute), but classes that do not implement `C`
    /// are skipped instead of failing the call.
    pub fn maybe_execute<C, F>(&self, category: &str, on_execute: F) -> EntrypointResult<()>
    where
        C: ?Sized + 'static,
        F: FnMut(Box<C>),
    {
        self.maybe_execute_with::<C, F, _>(category, on_execute, |_| {})
    }

    /// [`maybe_execute`](Self::maybe_execute) with an `on_load` observer that
    /// sees every resolved class, assignable or not, before it is filtered.
    pub fn maybe_execute_with<C, F, L>(
        &self,
        category: &str,
        on_execute: F,
        mut on_load: L,
    ) -> EntrypointResult<()>
    where
        C: ?Sized + 'static,
        F: FnMut(Box<C>),
        L: FnMut(&Class),
    {
        let mut instances: Vec<Box<C>> = Vec::new();
        for container in self.mods.all_mods() {
            for entrypoint in container.entrypoints(category) {
                let class = self.resolve(category, container, entrypoint)?;
                on_load(&class);

                if class.is_assignable_to::<C>() {
                    instances.push(construct::<C>(&class, category, container)?);
                } else {
                    debug!(
                        category,
                        class = class.name(),
                        capability = type_name::<C>(),
                        "Skipping entrypoint that does not implement capability"
                    );
                }
            }
        }
        run(category, instances, on_execute);
        Ok(())
    }

    fn resolve(
        &self,
        category: &str,
        container: &dyn ModContainer,
        entrypoint: &EntrypointMetadata,
    ) -> EntrypointResult<Class> {
        let class = self.classes.resolve(entrypoint.value()).ok_or_else(|| {
            EntrypointError::Unresolved {
                category: category.to_string(),
                class_name: entrypoint.value().to_string(),
                mod_name: container.name().to_string(),
            }
        })?;
        class
            .initialize()
            .map_err(|e| EntrypointError::ExecutionFailed {
                category: category.to_string(),
                class_name: class.name().to_string(),
                mod_name: container.name().to_string(),
                source: Box::new(e),
            })?;
        debug!(category, class = class.name(), mod_id = container.id(), "Resolved entrypoint class");
        Ok(class)
    }
}

fn construct<C: ?Sized + 'static>(
    class: &Class,
    category: &str,
    container: &dyn ModContainer,
) -> EntrypointResult<Box<C>> {
    let instance = class.instantiate().map_err(|e| match e {
        InstantiationError::Unconstructible(reason) => EntrypointError::NotConstructible {
            category: category.to_string(),
            class_name: class.name().to_string(),
            mod_name: container.name().to_string(),
            reason,
        },
        InstantiationError::Failed(source) => EntrypointError::ExecutionFailed {
            category: category.to_string(),
            class_name: class.name().to_string(),
            mod_name: container.name().to_string(),
            source,
        },
    })?;

    class
        .cast::<C>(instance)
        .map_err(|_| EntrypointError::IncompatibleType {
            category: category.to_string(),
            class_name: class.name().to_string(),
            mod_name: container.name().to_string(),
            capability: type_name::<C>(),
        })
}

fn run<C: ?Sized, F: FnMut(Box<C>)>(category: &str, instances: Vec<Box<C>>, on_execute: F) {
    debug!(category, count = instances.len(), "Executing entrypoints");
    instances.into_iter().for_each(on_execute);
}
