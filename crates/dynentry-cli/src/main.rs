//! dynentry CLI: inspect the entrypoints declared by a mods directory.

mod cli;
mod cmd;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use dynentry_types::config::LoaderConfig;

/// Trace to stderr so stdout stays clean for tables and `--json`.
fn init_tracing_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Config file values, then command-line overrides.
fn resolve_config(cli: &Cli) -> LoaderConfig {
    let mut config = dynentry_loader::config::load_config(cli.config.as_deref());
    if let Some(dir) = &cli.mods_dir {
        config.mods_dir = dir.clone();
    }
    if cli.strict {
        config.strict = true;
    }
    config
}

fn main() {
    let cli = Cli::parse();
    init_tracing_stderr();

    let config = resolve_config(&cli);

    match cli.command {
        Commands::Mods { json } => cmd::cmd_mods(&config, json),
        Commands::Entrypoints { category, json } => {
            cmd::cmd_entrypoints(&config, &category, json)
        }
        Commands::Categories => cmd::cmd_categories(&config),
        Commands::Validate { json } => cmd::cmd_validate(&config, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "mods_dir = \"from-file\"\nstrict = false\n").unwrap();

        let cli = Cli::try_parse_from([
            "dynentry",
            "--config",
            config_path.to_str().unwrap(),
            "--mods-dir",
            "/srv/mods",
            "--strict",
            "categories",
        ])
        .unwrap();
        let config = resolve_config(&cli);
        assert_eq!(config.mods_dir, PathBuf::from("/srv/mods"));
        assert!(config.strict);
    }

    #[test]
    fn test_config_file_used_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "mods_dir = \"from-file\"\nstrict = true\n").unwrap();

        let cli = Cli::try_parse_from([
            "dynentry",
            "--config",
            config_path.to_str().unwrap(),
            "validate",
        ])
        .unwrap();
        let config = resolve_config(&cli);
        assert_eq!(config.mods_dir, dir.path().join("from-file"));
        assert!(config.strict);
    }
}
