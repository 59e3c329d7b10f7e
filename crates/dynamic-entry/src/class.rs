//! Class registry: named, default-constructible entrypoint classes.
//!
//! Plugins register their entrypoint classes at startup under the fully-qualified
//! names their manifests declare. Each class carries a zero-argument factory and
//! a table of capability casts keyed by [`TypeId`], which is what makes
//! `is_assignable_to::<dyn Trait>()` a lookup instead of a runtime reflection call.

use dashmap::DashMap;
use dynentry_types::{BoxError, Unconstructible};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// A freshly constructed, not yet cast, entrypoint instance.
pub type Instance = Box<dyn Any + Send>;

type Factory = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

#[derive(Clone)]
enum Constructor {
    Public(Factory),
    Private,
    Abstract,
    Missing,
}

/// Converts an erased instance into `Box<C>`, handing it back on type mismatch.
struct Caster<C: ?Sized> {
    cast: Box<dyn Fn(Instance) -> Result<Box<C>, Instance> + Send + Sync>,
}

struct Capability {
    type_name: &'static str,
    /// Always a `Caster<C>` for the `C` whose `TypeId` keys this entry.
    caster: Box<dyn Any + Send + Sync>,
}

struct ClassInner {
    name: String,
    constructor: Constructor,
    capabilities: HashMap<TypeId, Capability>,
    static_init: Option<Box<dyn Fn() + Send + Sync>>,
    /// Outcome of the static initializer; a panic message on failure.
    initialized: OnceLock<Result<(), Arc<str>>>,
}

/// Failure to produce an instance from a resolved class.
#[derive(Debug, thiserror::Error)]
pub enum InstantiationError {
    #[error("{0}")]
    Unconstructible(Unconstructible),
    #[error("constructor failed: {0}")]
    Failed(#[source] BoxError),
}

/// A constructor that panicked instead of returning.
#[derive(Debug, thiserror::Error)]
#[error("constructor panicked: {message}")]
pub struct ConstructorPanic {
    pub message: String,
}

impl ConstructorPanic {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        Self {
            message: panic_message(payload.as_ref()),
        }
    }
}

/// A static initializer that panicked. Every later resolution of the class
/// reports the same failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("static initializer of {class} panicked: {message}")]
pub struct StaticInitPanic {
    pub class: String,
    pub message: Arc<str>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A resolved entrypoint class. Cheap to clone.
#[derive(Clone)]
pub struct Class {
    inner: Arc<ClassInner>,
}

impl Class {
    /// Start declaring a class whose instances are `T`.
    pub fn builder<T: Any + Send>(name: impl Into<String>) -> ClassBuilder<T> {
        ClassBuilder::new(name.into())
    }

    /// Fully-qualified class name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether instances of this class can be cast to `C`.
    pub fn is_assignable_to<C: ?Sized + 'static>(&self) -> bool {
        self.inner.capabilities.contains_key(&TypeId::of::<C>())
    }

    /// Type names of every capability this class is assignable to, sorted.
    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .inner
            .capabilities
            .values()
            .map(|c| c.type_name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Whether the class is backed by an accessible zero-argument constructor.
    pub fn is_constructible(&self) -> bool {
        matches!(self.inner.constructor, Constructor::Public(_))
    }

    /// Run the zero-argument constructor.
    ///
    /// Panics raised by the constructor are caught and reported as
    /// [`InstantiationError::Failed`] carrying a [`ConstructorPanic`].
    pub fn instantiate(&self) -> Result<Instance, InstantiationError> {
        let factory = match &self.inner.constructor {
            Constructor::Public(factory) => factory,
            Constructor::Private => {
                return Err(InstantiationError::Unconstructible(
                    Unconstructible::Inaccessible,
                ))
            }
            Constructor::Abstract => {
                return Err(InstantiationError::Unconstructible(Unconstructible::Abstract))
            }
            Constructor::Missing => {
                return Err(InstantiationError::Unconstructible(
                    Unconstructible::NoDefaultConstructor,
                ))
            }
        };

        match panic::catch_unwind(AssertUnwindSafe(|| (**factory)())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(e)) => Err(InstantiationError::Failed(e)),
            Err(payload) => Err(InstantiationError::Failed(Box::new(
                ConstructorPanic::from_payload(payload),
            ))),
        }
    }

    /// Cast an instance of this class to `C`, returning it unchanged on mismatch.
    pub fn cast<C: ?Sized + 'static>(&self, instance: Instance) -> Result<Box<C>, Instance> {
        let caster = self
            .inner
            .capabilities
            .get(&TypeId::of::<C>())
            .and_then(|c| c.caster.downcast_ref::<Caster<C>>());
        match caster {
            Some(caster) => (caster.cast)(instance),
            None => Err(instance),
        }
    }

    /// Construct and cast in one step.
    pub fn new_instance<C: ?Sized + 'static>(&self) -> Result<Box<C>, InstantiationError> {
        let instance = self.instantiate()?;
        self.cast::<C>(instance).map_err(|_| {
            InstantiationError::Failed(
                format!("{} is not assignable to {}", self.name(), type_name::<C>()).into(),
            )
        })
    }

    /// Run the static initializer if it has not run yet.
    ///
    /// The initializer runs at most once. A panic is caught and remembered, so
    /// this and every later call return the same [`StaticInitPanic`].
    pub fn initialize(&self) -> Result<(), StaticInitPanic> {
        let Some(init) = &self.inner.static_init else {
            return Ok(());
        };
        let outcome = self.inner.initialized.get_or_init(|| {
            debug!(class = %self.inner.name, "Running static initializer");
            panic::catch_unwind(AssertUnwindSafe(|| init()))
                .map_err(|payload| Arc::<str>::from(panic_message(payload.as_ref())))
        });
        outcome.clone().map_err(|message| StaticInitPanic {
            class: self.inner.name.clone(),
            message,
        })
    }

    /// Whether the static initializer has completed successfully. Classes
    /// without one report `false`.
    pub fn is_initialized(&self) -> bool {
        self.inner.static_init.is_some() && matches!(self.inner.initialized.get(), Some(Ok(())))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.inner.name)
            .field("constructible", &self.is_constructible())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

/// Builder for a [`Class`] whose instances are `T`.
pub struct ClassBuilder<T> {
    name: String,
    constructor: Constructor,
    capabilities: HashMap<TypeId, Capability>,
    static_init: Option<Box<dyn Fn() + Send + Sync>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send> ClassBuilder<T> {
    fn new(name: String) -> Self {
        let builder = Self {
            name,
            constructor: Constructor::Missing,
            capabilities: HashMap::new(),
            static_init: None,
            _marker: PhantomData,
        };
        // Every class is assignable to its own concrete type.
        builder.implements::<T>(|this| this)
    }

    /// Public zero-argument constructor.
    pub fn constructor<F, E>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.constructor = Constructor::Public(Arc::new(move || {
            factory()
                .map(|value| Box::new(value) as Instance)
                .map_err(Into::into)
        }));
        self
    }

    /// Public zero-argument constructor backed by `T::default()`.
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(|| Ok::<T, BoxError>(T::default()))
    }

    /// The zero-argument constructor exists but callers may not use it.
    pub fn private_constructor(mut self) -> Self {
        self.constructor = Constructor::Private;
        self
    }

    /// The class cannot be instantiated at all.
    pub fn abstract_class(mut self) -> Self {
        self.constructor = Constructor::Abstract;
        self
    }

    /// Declare that instances implement capability `C`.
    ///
    /// For trait objects the cast is usually just `|this| this`.
    pub fn implements<C: ?Sized + 'static>(mut self, cast: fn(Box<T>) -> Box<C>) -> Self {
        let caster = Caster::<C> {
            cast: Box::new(move |instance: Instance| instance.downcast::<T>().map(cast)),
        };
        self.capabilities.insert(
            TypeId::of::<C>(),
            Capability {
                type_name: type_name::<C>(),
                caster: Box::new(caster),
            },
        );
        self
    }

    /// Code to run once, the first time the class is resolved.
    pub fn static_init(mut self, init: impl Fn() + Send + Sync + 'static) -> Self {
        self.static_init = Some(Box::new(init));
        self
    }

    pub fn build(self) -> Class {
        Class {
            inner: Arc::new(ClassInner {
                name: self.name,
                constructor: self.constructor,
                capabilities: self.capabilities,
                static_init: self.static_init,
                initialized: OnceLock::new(),
            }),
        }
    }
}

/// Resolves fully-qualified class names.
pub trait ClassResolver {
    /// Look up a class by name.
    fn resolve(&self, name: &str) -> Option<Class>;
}

impl<R: ClassResolver + ?Sized> ClassResolver for &R {
    fn resolve(&self, name: &str) -> Option<Class> {
        (**self).resolve(name)
    }
}

impl<R: ClassResolver + ?Sized> ClassResolver for Arc<R> {
    fn resolve(&self, name: &str) -> Option<Class> {
        (**self).resolve(name)
    }
}

/// Registry of classes, keyed by fully-qualified name.
///
/// Registration may happen from any thread. Resolution hands out a clone, so
/// no map guard is held while a class is initialized or instantiated.
#[derive(Default)]
pub struct ClassRegistry {
    classes: DashMap<String, Class>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, returning the class previously registered under the
    /// same name.
    pub fn register(&self, class: Class) -> Option<Class> {
        let name = class.name().to_string();
        let previous = self.classes.insert(name.clone(), class);
        if previous.is_some() {
            warn!(class = %name, "Replacing previously registered class");
        } else {
            debug!(class = %name, "Registered class");
        }
        previous
    }

    pub fn unregister(&self, name: &str) -> Option<Class> {
        self.classes.remove(name).map(|(_, class)| class)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All registered names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl ClassResolver for ClassRegistry {
    fn resolve(&self, name: &str) -> Option<Class> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }
}
