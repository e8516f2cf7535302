//! Shell command execution.

pub mod command;
pub mod platform;

pub use command::{execute, execute_checked, CommandOptions, CommandOutput};
pub use platform::{is_ci, shell_executable, shell_flag};
