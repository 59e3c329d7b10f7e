//! Clap CLI definitions for dynentry.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const AFTER_HELP: &str = "\
\x1b[1;36mExamples:\x1b[0m
  dynentry mods                     List discovered mods
  dynentry entrypoints main         Classes declared under the `main` entrypoint
  dynentry categories               Every entrypoint category in use
  dynentry validate                 Check every manifest, fail on problems";

/// dynentry: inspect the entrypoints declared by a mods directory.
#[derive(Parser)]
#[command(name = "dynentry", version, about, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to config file (default: ~/.dynentry/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the mods directory from the config file.
    #[arg(long, global = true)]
    pub mods_dir: Option<PathBuf>,

    /// Treat invalid manifests and duplicate mod ids as errors.
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List discovered mods.
    Mods {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List classes declared under an entrypoint category, in load order.
    Entrypoints {
        /// Entrypoint category (e.g. `main`, `client`).
        category: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List every entrypoint category declared by any mod.
    Categories,
    /// Validate every manifest in the mods directory.
    Validate {
        /// Output the report as JSON.
        #[arg(long)]
        json: bool,
    },
}
