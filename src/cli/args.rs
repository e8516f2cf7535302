//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// cfgtool - Editor and toolchain environment bootstrapper.
#[derive(Debug, Parser)]
#[command(name = "cfgtool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (replaces ./cfgtool.yml)
    #[arg(short, long, global = true, env = "CFGTOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for cloned repositories (overrides deps_root)
    #[arg(long, global = true)]
    pub deps_root: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap the environment (default if no command specified)
    Run(RunArgs),

    /// Show tool status and the installation plan
    Status(StatusArgs),

    /// Show the merged configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Show the plan without cloning, installing or linking
    #[arg(long)]
    pub dry_run: bool,

    /// Replace existing files and symlinks at link targets
    #[arg(long)]
    pub overwrite_links: bool,

    /// Do not create links
    #[arg(long)]
    pub skip_links: bool,

    /// Do not bind or clone repositories before installing
    #[arg(long)]
    pub skip_repos: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
