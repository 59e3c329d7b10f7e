//! Dynamic entrypoints: load and execute the classes mods declare.
//!
//! A mod lists class names under an entrypoint category in its manifest. At
//! startup each plugin registers those classes (with a zero-argument factory
//! and the capability traits they implement) in a [`ClassRegistry`]. The
//! [`DynamicEntry`] operations then tie the two together:
//!
//! - [`DynamicEntry::load`] resolves every declared class.
//! - [`DynamicEntry::execute`] constructs every declared class as a capability
//!   `C` and hands each instance to a callback.
//! - [`DynamicEntry::maybe_execute`] does the same but skips classes that do
//!   not implement `C`.
//!
//! ```
//! use dynamic_entry::{Class, ClassRegistry, DynamicEntry};
//! use dynentry_types::ModMetadata;
//!
//! trait Initializer: Send {
//!     fn init(&self) -> &'static str;
//! }
//!
//! #[derive(Default)]
//! struct ExampleInit;
//!
//! impl Initializer for ExampleInit {
//!     fn init(&self) -> &'static str {
//!         "example ready"
//!     }
//! }
//!
//! let classes = ClassRegistry::new();
//! classes.register(
//!     Class::builder::<ExampleInit>("net.example.ExampleInit")
//!         .default_constructor()
//!         .implements::<dyn Initializer>(|this| this)
//!         .build(),
//! );
//! let mods = vec![ModMetadata::new("example").entrypoint("main", "net.example.ExampleInit")];
//!
//! let mut log = Vec::new();
//! DynamicEntry::new(&mods, &classes)
//!     .execute::<dyn Initializer, _>("main", |init| log.push(init.init()))
//!     .unwrap();
//! assert_eq!(log, vec!["example ready"]);
//! ```

pub mod class;
pub mod entrypoints;

pub use class::{
    Class, ClassBuilder, ClassRegistry, ClassResolver, ConstructorPanic, Instance,
    InstantiationError, StaticInitPanic,
};
pub use entrypoints::DynamicEntry;
