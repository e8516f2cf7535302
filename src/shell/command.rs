//! Shell command execution.
//!
//! Install recipes and build steps are plain shell strings. They run through
//! a POSIX shell so that pipes and `&&` chains work as written in the config.

use crate::error::{CfgError, Result};
use crate::shell::platform::{shell_executable, shell_flag};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output, empty unless captured.
    pub stdout: String,

    /// Standard error, empty unless captured.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CommandOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last non-empty line of stderr, falling back to stdout.
    pub fn last_line(&self) -> Option<&str> {
        [&self.stderr, &self.stdout]
            .into_iter()
            .find_map(|text| text.lines().rev().find(|l| !l.trim().is_empty()))
            .map(str::trim)
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr instead of inheriting them.
    pub capture: bool,
}

impl CommandOptions {
    /// Capture output, running in `cwd` when given.
    pub fn captured(cwd: Option<&Path>) -> Self {
        Self {
            cwd: cwd.map(Path::to_path_buf),
            capture: true,
            ..Default::default()
        }
    }
}

/// Execute a shell command.
///
/// A non-zero exit is not an error; inspect [`CommandOutput::success`].
/// Failing to start the shell at all is.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandOutput> {
    let start = Instant::now();

    let mut cmd = Command::new(shell_executable());
    cmd.arg(shell_flag()).arg(command).stdin(Stdio::null());

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }

    tracing::debug!("running `{}` in {:?}", command, options.cwd);

    let output = cmd.output().map_err(|e| {
        tracing::warn!("could not start `{}`: {}", command, e);
        CfgError::CommandFailed {
            command: command.to_string(),
            code: None,
        }
    })?;

    Ok(CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
    })
}

/// Execute a command and fail with [`CfgError::CommandFailed`] on a
/// non-zero exit.
pub fn execute_checked(command: &str, options: &CommandOptions) -> Result<CommandOutput> {
    let output = execute(command, options)?;
    if output.success() {
        Ok(output)
    } else {
        tracing::warn!(
            "`{}` exited with {:?}: {}",
            command,
            output.exit_code,
            output.last_line().unwrap_or("no output")
        );
        Err(CfgError::CommandFailed {
            command: command.to_string(),
            code: output.exit_code,
        })
    }
}
