//! Error types for cfgtool operations.
//!
//! This module defines [`CfgError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe, repository, install and link failures are recovered where they
//!   happen and turned into report records; they only travel as `CfgError`
//!   until the nearest boundary that records them
//! - Configuration errors are the only ones that abort a run
//! - Use `anyhow::Error` (via `CfgError::Other`) inside leaf I/O adapters

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cfgtool operations.
#[derive(Debug, Error)]
pub enum CfgError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Tool prerequisite cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// The tool could not be found on the search path.
    #[error("'{tool}' was not found on PATH")]
    BinaryAbsent { tool: String },

    /// The tool ran but its version output could not be parsed.
    #[error("Could not read the version of '{tool}': {message}")]
    VersionParseFailure { tool: String, message: String },

    /// The tool is installed but older than required.
    #[error("'{tool}' {detected} is older than the required {minimum}")]
    VersionBelowMinimum {
        tool: String,
        detected: String,
        minimum: String,
    },

    /// An existing local directory could not be opened as a repository.
    #[error("Could not bind to repository '{name}' at {path}: {message}")]
    RepositoryBindFailure {
        name: String,
        path: PathBuf,
        message: String,
    },

    /// Cloning a repository failed.
    #[error("Could not clone repository '{name}' from {remote}: {message}")]
    RepositoryCloneFailure {
        name: String,
        remote: String,
        message: String,
    },

    /// A tool installer ran and failed.
    #[error("Installing '{tool}' failed: {message}")]
    InstallerFailure { tool: String, message: String },

    /// A tool install was not attempted because a prerequisite is unavailable.
    #[error("Skipped '{tool}': prerequisite '{prerequisite}' is not available")]
    PrerequisiteSkipped { tool: String, prerequisite: String },

    /// A symlink destination already exists.
    #[error("Not linking {target}: destination already exists")]
    SymlinkConflict { target: PathBuf },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CfgError {
    /// Whether this error comes from loading or validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CfgError::ConfigNotFound { .. }
                | CfgError::ConfigParseError { .. }
                | CfgError::ConfigValidationError { .. }
                | CfgError::CircularDependency { .. }
        )
    }
}

/// Result type alias for cfgtool operations.
pub type Result<T> = std::result::Result<T, CfgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = CfgError::ConfigParseError {
            path: PathBuf::from("/cfgtool.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/cfgtool.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn version_below_minimum_names_both_versions() {
        let err = CfgError::VersionBelowMinimum {
            tool: "node".into(),
            detected: "8.3".into(),
            minimum: "10.12".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("node"));
        assert!(msg.contains("8.3"));
        assert!(msg.contains("10.12"));
    }

    #[test]
    fn clone_failure_displays_remote() {
        let err = CfgError::RepositoryCloneFailure {
            name: "ccls".into(),
            remote: "https://github.com/MaskRay/ccls".into(),
            message: "network unreachable".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ccls"));
        assert!(msg.contains("github.com/MaskRay/ccls"));
        assert!(msg.contains("network unreachable"));
    }

    #[test]
    fn prerequisite_skipped_names_prerequisite() {
        let err = CfgError::PrerequisiteSkipped {
            tool: "ccls".into(),
            prerequisite: "cmake".into(),
        };
        assert!(err.to_string().contains("'cmake'"));
    }

    #[test]
    fn symlink_conflict_displays_target() {
        let err = CfgError::SymlinkConflict {
            target: PathBuf::from("/home/dev/.vimrc"),
        };
        assert!(err.to_string().contains("/home/dev/.vimrc"));
    }

    #[test]
    fn config_errors_are_classified() {
        assert!(CfgError::ConfigValidationError {
            message: "x".into()
        }
        .is_config_error());
        assert!(CfgError::CircularDependency { cycle: "a".into() }.is_config_error());
        assert!(!CfgError::BinaryAbsent { tool: "vim".into() }.is_config_error());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CfgError = io_err.into();
        assert!(matches!(err, CfgError::Io(_)));
    }
}
