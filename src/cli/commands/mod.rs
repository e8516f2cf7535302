//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and carries the global flags in a
//! [`CommandContext`].

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod run;
pub mod status;
pub mod wiring;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
