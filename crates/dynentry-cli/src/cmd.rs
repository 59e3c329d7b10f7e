//! Subcommand implementations: mods, entrypoints, categories, validate.

use crate::ui;
use dynentry_loader::discovery::{check_manifests, ManifestCheck};
use dynentry_loader::ManifestModRegistry;
use dynentry_types::config::LoaderConfig;
use dynentry_types::ModContainer;
use serde_json::json;

fn discover_or_exit(config: &LoaderConfig) -> ManifestModRegistry {
    match ManifestModRegistry::discover(config) {
        Ok(registry) => registry,
        Err(e) => {
            ui::error(&format!("Mod discovery failed: {e}"));
            std::process::exit(1);
        }
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn mods_json(registry: &ManifestModRegistry) -> serde_json::Value {
    let arr: Vec<serde_json::Value> = registry
        .mods()
        .iter()
        .map(|m| {
            json!({
                "id": m.metadata.id,
                "name": m.metadata.name(),
                "version": m.metadata.version,
                "categories": m.metadata.categories().collect::<Vec<_>>(),
                "manifest": m.manifest_path.as_ref().map(|p| p.display().to_string()),
            })
        })
        .collect();
    serde_json::Value::Array(arr)
}

fn entrypoints_json(registry: &ManifestModRegistry, category: &str) -> serde_json::Value {
    let arr: Vec<serde_json::Value> = registry
        .declarations(category)
        .into_iter()
        .map(|(mod_id, entry)| {
            json!({
                "mod": mod_id,
                "adapter": entry.adapter(),
                "class": entry.value(),
            })
        })
        .collect();
    serde_json::Value::Array(arr)
}

fn checks_json(checks: &[ManifestCheck]) -> serde_json::Value {
    serde_json::Value::Array(
        checks
            .iter()
            .map(|c| {
                json!({
                    "manifest": c.manifest_path.display().to_string(),
                    "mod": c.mod_id,
                    "problems": c.problems,
                })
            })
            .collect(),
    )
}

pub fn cmd_mods(config: &LoaderConfig, json: bool) {
    let registry = discover_or_exit(config);
    if json {
        print_json(&mods_json(&registry));
        return;
    }
    if registry.is_empty() {
        println!("No mods found in {}.", config.mods_dir.display());
        return;
    }
    println!("{:<24} {:<28} {:<12} CATEGORIES", "ID", "NAME", "VERSION");
    println!("{}", "-".repeat(80));
    for m in registry.mods() {
        let categories: Vec<&str> = m.metadata.categories().collect();
        println!(
            "{:<24} {:<28} {:<12} {}",
            m.metadata.id,
            m.metadata.name(),
            m.metadata.version,
            categories.join(", "),
        );
    }
}

pub fn cmd_entrypoints(config: &LoaderConfig, category: &str, json: bool) {
    let registry = discover_or_exit(config);
    if json {
        print_json(&entrypoints_json(&registry, category));
        return;
    }
    let declarations = registry.declarations(category);
    if declarations.is_empty() {
        println!("No mod declares a '{category}' entrypoint.");
        return;
    }
    println!("{:<24} {:<12} CLASS", "MOD", "ADAPTER");
    println!("{}", "-".repeat(80));
    for (mod_id, entry) in declarations {
        println!("{:<24} {:<12} {}", mod_id, entry.adapter(), entry.value());
    }
}

pub fn cmd_categories(config: &LoaderConfig) {
    let registry = discover_or_exit(config);
    let categories = registry.categories();
    if categories.is_empty() {
        println!("No entrypoint categories declared.");
        return;
    }
    for category in categories {
        let count = registry.declarations(&category).len();
        println!("{category:<24} {count} class(es)");
    }
}

pub fn cmd_validate(config: &LoaderConfig, json: bool) {
    let checks = match check_manifests(config) {
        Ok(checks) => checks,
        Err(e) => {
            ui::error(&format!("Validation failed: {e}"));
            std::process::exit(1);
        }
    };

    if json {
        print_json(&checks_json(&checks));
        if checks.iter().any(|c| !c.is_ok()) {
            std::process::exit(1);
        }
        return;
    }

    ui::section("Validating mods");
    ui::kv("Directory", &config.mods_dir.display().to_string());
    ui::blank();

    let failed = report_checks(&checks);

    ui::blank();
    if failed == 0 {
        ui::check_ok(&format!("{} manifest(s) valid", checks.len()));
        if checks.is_empty() {
            ui::hint("each mod lives in its own subdirectory with a fabric.mod.json or mod.toml");
        }
    } else {
        ui::check_fail(&format!(
            "{failed} of {} manifest(s) have problems",
            checks.len()
        ));
        std::process::exit(1);
    }
}

/// Print one line per manifest; returns how many had problems.
fn report_checks(checks: &[ManifestCheck]) -> usize {
    let mut failed = 0;
    for check in checks {
        let label = match &check.mod_id {
            Some(id) => format!("{id} ({})", check.manifest_path.display()),
            None => check.manifest_path.display().to_string(),
        };
        if check.is_ok() {
            ui::check_ok(&label);
        } else {
            failed += 1;
            ui::check_fail(&label);
            for problem in &check.problems {
                ui::detail(problem);
            }
        }
    }
    failed
}
