//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the global flags every command shares
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{self, CfgConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where a command runs and which config it reads.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory `./cfgtool.yml` and a relative `deps_root` resolve against.
    pub working_dir: PathBuf,
    /// `--config`.
    pub config_path: Option<PathBuf>,
    /// `--deps-root`.
    pub deps_root: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            config_path: None,
            deps_root: None,
        }
    }

    /// Load, merge and validate the configuration, applying `--deps-root`.
    pub fn load_config(&self) -> Result<CfgConfig> {
        let mut config = config::load_config(&self.working_dir, self.config_path.as_deref())?;
        if let Some(root) = &self.deps_root {
            config.deps_root = root.clone();
        }
        Ok(config)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Build a dispatcher from parsed global flags.
    pub fn from_cli(cli: &Cli, working_dir: &Path) -> Self {
        Self::new(CommandContext {
            working_dir: working_dir.to_path_buf(),
            config_path: cli.config.clone(),
            deps_root: cli.deps_root.clone(),
        })
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.clone();
        match &cli.command {
            Some(Commands::Run(args)) => super::run::RunCommand::new(ctx, args.clone()).execute(ui),
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(ctx, RunArgs::default()).execute(ui),
        }
    }
}
