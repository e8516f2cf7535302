//! Command-line interface for cfgtool.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, ConfigArgs, RunArgs, StatusArgs};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
