//! Integration tests for the load / execute / maybe_execute contract.
//!
//! These tests wire a fake mod registry (plain structs, no manifests on disk)
//! and a real ClassRegistry through DynamicEntry, recording every constructor
//! and callback in a shared event log so ordering can be asserted exactly.

use dynamic_entry::{Class, ClassRegistry, ConstructorPanic, DynamicEntry, StaticInitPanic};
use dynentry_types::{
    BoxError, EntrypointError, EntrypointMetadata, ModContainer, ModRegistry, Unconstructible,
};
use std::cell::Cell;
use std::error::Error as _;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Fake mod registry
// ---------------------------------------------------------------------------

struct FakeMod {
    id: String,
    name: String,
    category: String,
    entries: Vec<EntrypointMetadata>,
}

impl ModContainer for FakeMod {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn entrypoints(&self, category: &str) -> &[EntrypointMetadata] {
        if category == self.category {
            &self.entries
        } else {
            &[]
        }
    }
}

#[derive(Default)]
struct FakeMods(Vec<FakeMod>);

impl FakeMods {
    fn with(mut self, id: &str, category: &str, classes: &[&str]) -> Self {
        self.0.push(FakeMod {
            id: id.to_string(),
            name: format!("{id} mod"),
            category: category.to_string(),
            entries: classes.iter().map(|c| EntrypointMetadata::new(*c)).collect(),
        });
        self
    }
}

impl ModRegistry for FakeMods {
    fn all_mods(&self) -> Vec<&dyn ModContainer> {
        self.0.iter().map(|m| m as &dyn ModContainer).collect()
    }
}

// ---------------------------------------------------------------------------
// Test classes
// ---------------------------------------------------------------------------

type EventLog = Arc<Mutex<Vec<String>>>;

trait Plugin: Send {
    fn id(&self) -> &str;
}

struct Tagged(String);

impl Plugin for Tagged {
    fn id(&self) -> &str {
        &self.0
    }
}

struct NotAPlugin;

fn plugin_class(name: &str, log: &EventLog) -> Class {
    let log = log.clone();
    let tag = name.to_string();
    Class::builder::<Tagged>(name)
        .constructor(move || {
            log.lock().unwrap().push(format!("construct {tag}"));
            Ok::<_, BoxError>(Tagged(tag.clone()))
        })
        .implements::<dyn Plugin>(|this| this)
        .build()
}

fn setup(log: &EventLog) -> ClassRegistry {
    let classes = ClassRegistry::new();
    classes.register(plugin_class("test.A", log));
    classes.register(plugin_class("test.B", log));
    classes.register(plugin_class("test.C", log));
    classes.register(
        Class::builder::<NotAPlugin>("test.NotAPlugin")
            .constructor(|| Ok::<_, BoxError>(NotAPlugin))
            .build(),
    );
    classes
}

fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Empty categories
// ---------------------------------------------------------------------------

#[test]
fn test_empty_category_runs_no_callbacks() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default().with("a", "main", &["test.A"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let calls = Cell::new(0);
    entry
        .load_with("client", |_| calls.set(calls.get() + 1))
        .unwrap();
    entry
        .execute::<dyn Plugin, _>("client", |_| calls.set(calls.get() + 1))
        .unwrap();
    entry
        .maybe_execute_with::<dyn Plugin, _, _>(
            "client",
            |_| calls.set(calls.get() + 1),
            |_| calls.set(calls.get() + 1),
        )
        .unwrap();
    assert_eq!(calls.get(), 0);
    assert!(events(&log).is_empty());
}

#[test]
fn test_no_mods_at_all() {
    let classes = ClassRegistry::new();
    let mods = FakeMods::default();
    let entry = DynamicEntry::new(&mods, &classes);
    entry.load("main").unwrap();
    entry.execute::<dyn Plugin, _>("main", |_| panic!("no callbacks expected")).unwrap();
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

#[test]
fn test_load_order_across_mods() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default()
        .with("first", "foo", &["test.B", "test.A"])
        .with("second", "foo", &["test.C"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let mut loaded = Vec::new();
    entry
        .load_with("foo", |class| loaded.push(class.name().to_string()))
        .unwrap();
    assert_eq!(loaded, vec!["test.B", "test.A", "test.C"]);
    // Loading never constructs anything.
    assert!(events(&log).is_empty());
}

#[test]
fn test_load_stops_at_unresolved_class() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default()
        .with("first", "foo", &["test.A", "test.Missing"])
        .with("second", "foo", &["test.C"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let mut loaded = Vec::new();
    let err = entry
        .load_with("foo", |class| loaded.push(class.name().to_string()))
        .unwrap_err();

    assert_eq!(loaded, vec!["test.A"]);
    match &err {
        EntrypointError::Unresolved {
            category,
            class_name,
            mod_name,
        } => {
            assert_eq!(category, "foo");
            assert_eq!(class_name, "test.Missing");
            assert_eq!(mod_name, "first mod");
        }
        other => panic!("expected Unresolved, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "class test.Missing specified in the foo entrypoint of mod first mod does not exist"
    );
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn test_execute_constructs_all_before_any_callback() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default()
        .with("first", "foo", &["test.A", "test.B"])
        .with("second", "foo", &["test.C"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let callback_log = log.clone();
    entry
        .execute::<dyn Plugin, _>("foo", |plugin| {
            callback_log
                .lock()
                .unwrap()
                .push(format!("execute {}", plugin.id()));
        })
        .unwrap();

    assert_eq!(
        events(&log),
        vec![
            "construct test.A",
            "construct test.B",
            "construct test.C",
            "execute test.A",
            "execute test.B",
            "execute test.C",
        ]
    );
}

#[test]
fn test_execute_late_unresolved_runs_no_callbacks() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default()
        .with("first", "foo", &["test.A"])
        .with("second", "foo", &["test.Gone"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let mut executed = 0;
    let err = entry
        .execute::<dyn Plugin, _>("foo", |_| executed += 1)
        .unwrap_err();
    assert!(matches!(err, EntrypointError::Unresolved { .. }));
    assert_eq!(err.mod_name(), "second mod");
    assert_eq!(executed, 0);
    assert_eq!(events(&log), vec!["construct test.A"]);
}

#[test]
fn test_execute_private_constructor_not_constructible() {
    let log = EventLog::default();
    let classes = setup(&log);
    classes.register(
        Class::builder::<Tagged>("test.Private")
            .private_constructor()
            .implements::<dyn Plugin>(|this| this)
            .build(),
    );
    let mods = FakeMods::default().with("m", "foo", &["test.A", "test.Private"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let mut executed = 0;
    let err = entry
        .execute::<dyn Plugin, _>("foo", |_| executed += 1)
        .unwrap_err();
    match err {
        EntrypointError::NotConstructible {
            ref class_name,
            reason,
            ..
        } => {
            assert_eq!(class_name, "test.Private");
            assert_eq!(reason, Unconstructible::Inaccessible);
        }
        other => panic!("expected NotConstructible, got {other:?}"),
    }
    assert_eq!(executed, 0);
}

#[test]
fn test_execute_missing_constructor_not_constructible() {
    let classes = ClassRegistry::new();
    classes.register(
        Class::builder::<Tagged>("test.NoCtor")
            .implements::<dyn Plugin>(|this| this)
            .build(),
    );
    let mods = FakeMods::default().with("m", "foo", &["test.NoCtor"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let err = entry.execute::<dyn Plugin, _>("foo", |_| {}).unwrap_err();
    assert!(matches!(
        err,
        EntrypointError::NotConstructible {
            reason: Unconstructible::NoDefaultConstructor,
            ..
        }
    ));
}

#[test]
fn test_execute_constructor_error_wraps_cause() {
    let log = EventLog::default();
    let classes = setup(&log);
    classes.register(
        Class::builder::<Tagged>("test.Broken")
            .constructor(|| Err::<Tagged, _>("missing config file"))
            .implements::<dyn Plugin>(|this| this)
            .build(),
    );
    let mods = FakeMods::default().with("m", "foo", &["test.A", "test.Broken"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let mut executed = 0;
    let err = entry
        .execute::<dyn Plugin, _>("foo", |_| executed += 1)
        .unwrap_err();
    assert!(matches!(err, EntrypointError::ExecutionFailed { .. }));
    assert_eq!(
        err.to_string(),
        "an error was encountered during the instantiation of the foo entrypoint class test.Broken"
    );
    assert_eq!(
        err.source().map(|s| s.to_string()).as_deref(),
        Some("missing config file")
    );
    assert_eq!(executed, 0);
}

#[test]
fn test_execute_constructor_panic_wraps_cause() {
    let classes = ClassRegistry::new();
    classes.register(
        Class::builder::<Tagged>("test.Panics")
            .constructor(|| -> Result<Tagged, BoxError> { panic!("static state poisoned") })
            .implements::<dyn Plugin>(|this| this)
            .build(),
    );
    let mods = FakeMods::default().with("m", "foo", &["test.Panics"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let err = entry.execute::<dyn Plugin, _>("foo", |_| {}).unwrap_err();
    let cause = err.source().unwrap();
    let panic = cause.downcast_ref::<ConstructorPanic>().unwrap();
    assert_eq!(panic.message, "static state poisoned");
}

// ---------------------------------------------------------------------------
// Static initializers
// ---------------------------------------------------------------------------

#[test]
fn test_static_init_runs_before_first_construction() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let classes = setup(&log);
    let init_log = log.clone();
    let tag = "test.Init".to_string();
    let ctor_log = log.clone();
    classes.register(
        Class::builder::<Tagged>("test.Init")
            .constructor(move || {
                ctor_log.lock().unwrap().push("construct test.Init".to_string());
                Ok::<_, BoxError>(Tagged(tag.clone()))
            })
            .implements::<dyn Plugin>(|this| this)
            .static_init(move || init_log.lock().unwrap().push("init test.Init".to_string()))
            .build(),
    );
    let mods = FakeMods::default().with("m", "foo", &["test.Init", "test.Init"]);
    let entry = DynamicEntry::new(&mods, &classes);

    entry.execute::<dyn Plugin, _>("foo", |_| {}).unwrap();
    assert_eq!(
        events(&log),
        vec!["init test.Init", "construct test.Init", "construct test.Init"]
    );
}

#[test]
fn test_static_init_panic_fails_every_call() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let classes = setup(&log);
    classes.register(
        Class::builder::<Tagged>("test.BadInit")
            .constructor(|| Ok::<_, BoxError>(Tagged("bad".to_string())))
            .implements::<dyn Plugin>(|this| this)
            .static_init(|| panic!("init boom"))
            .build(),
    );
    let mods = FakeMods::default()
        .with("first", "foo", &["test.A"])
        .with("second", "foo", &["test.BadInit"]);
    let entry = DynamicEntry::new(&mods, &classes);

    for _ in 0..2 {
        let err = entry.load("foo").unwrap_err();
        assert!(matches!(err, EntrypointError::ExecutionFailed { .. }));
        assert_eq!(err.class_name(), "test.BadInit");
        assert_eq!(err.mod_name(), "second mod");
        let cause = err.source().unwrap().downcast_ref::<StaticInitPanic>().unwrap();
        assert_eq!(&*cause.message, "init boom");
    }

    let mut executed = 0;
    let err = entry
        .execute::<dyn Plugin, _>("foo", |_| executed += 1)
        .unwrap_err();
    assert!(matches!(err, EntrypointError::ExecutionFailed { .. }));
    assert_eq!(executed, 0);

    let err = entry
        .maybe_execute::<dyn Plugin, _>("foo", |_| executed += 1)
        .unwrap_err();
    assert_eq!(err.class_name(), "test.BadInit");
    assert_eq!(executed, 0);
}

// ---------------------------------------------------------------------------
// maybe_execute
// ---------------------------------------------------------------------------

#[test]
fn test_maybe_execute_observes_all_executes_assignable() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default().with("m", "foo", &["test.A", "test.NotAPlugin"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let loaded = Mutex::new(Vec::new());
    let mut executed = Vec::new();
    entry
        .maybe_execute_with::<dyn Plugin, _, _>(
            "foo",
            |plugin| executed.push(plugin.id().to_string()),
            |class| loaded.lock().unwrap().push(class.name().to_string()),
        )
        .unwrap();

    assert_eq!(
        loaded.into_inner().unwrap(),
        vec!["test.A", "test.NotAPlugin"]
    );
    assert_eq!(executed, vec!["test.A"]);
    // The non-assignable class is never constructed.
    assert_eq!(events(&log), vec!["construct test.A"]);
}

#[test]
fn test_maybe_execute_failure_preserves_cause() {
    let classes = ClassRegistry::new();
    classes.register(
        Class::builder::<Tagged>("test.Broken")
            .constructor(|| Err::<Tagged, _>("disk full"))
            .implements::<dyn Plugin>(|this| this)
            .build(),
    );
    let mods = FakeMods::default().with("m", "foo", &["test.Broken"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let err = entry.maybe_execute::<dyn Plugin, _>("foo", |_| {}).unwrap_err();
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("disk full"));
}

#[test]
fn test_maybe_execute_unresolved_still_fails() {
    let log = EventLog::default();
    let classes = setup(&log);
    let mods = FakeMods::default().with("m", "foo", &["test.A", "test.Nowhere"]);
    let entry = DynamicEntry::new(&mods, &classes);

    let mut executed = 0;
    let err = entry
        .maybe_execute::<dyn Plugin, _>("foo", |_| executed += 1)
        .unwrap_err();
    assert_eq!(err.class_name(), "test.Nowhere");
    assert_eq!(executed, 0);
}
