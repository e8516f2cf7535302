//! Tool status types.
//!
//! Each classified requirement produces a [`ToolStatus`] describing whether
//! the tool is usable as-is. Statuses are recomputed on every run.

use crate::requirements::version::Version;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Classification of a single tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolState {
    /// Present and at or above its minimum version (or it has none).
    Satisfied,
    /// Not found on PATH.
    Missing,
    /// Found, but older than the minimum version.
    Outdated,
    /// Found, but its version output could not be read.
    ProbeFailed,
}

impl ToolState {
    /// Whether the tool needs no action.
    pub fn is_satisfied(self) -> bool {
        matches!(self, ToolState::Satisfied)
    }

    /// Short human label.
    pub fn label(self) -> &'static str {
        match self {
            ToolState::Satisfied => "satisfied",
            ToolState::Missing => "missing",
            ToolState::Outdated => "outdated",
            ToolState::ProbeFailed => "probe failed",
        }
    }
}

impl fmt::Display for ToolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The result of classifying a single tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Tool identifier.
    pub identifier: String,
    /// Where the binary was found.
    pub resolved_path: Option<PathBuf>,
    /// Version read from the binary.
    pub detected_version: Option<Version>,
    /// Minimum version the tool was checked against.
    pub minimum_version: Option<Version>,
    /// Classification.
    pub state: ToolState,
    /// Why the tool is in this state.
    pub message: String,
}

impl ToolStatus {
    /// A tool that was not found.
    pub fn missing(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            resolved_path: None,
            detected_version: None,
            minimum_version: None,
            state: ToolState::Missing,
            message: format!("'{}' was not found on PATH", identifier),
        }
    }

    /// Whether the tool needs no action.
    pub fn is_satisfied(&self) -> bool {
        self.state.is_satisfied()
    }

    /// Detected version for display, `-` when unknown.
    pub fn version_label(&self) -> String {
        self.detected_version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_satisfied_is_satisfied() {
        assert!(ToolState::Satisfied.is_satisfied());
        assert!(!ToolState::Missing.is_satisfied());
        assert!(!ToolState::Outdated.is_satisfied());
        assert!(!ToolState::ProbeFailed.is_satisfied());
    }

    #[test]
    fn probe_failed_label_differs_from_missing() {
        assert_ne!(ToolState::ProbeFailed.label(), ToolState::Missing.label());
    }

    #[test]
    fn missing_status_has_no_path_or_version() {
        let status = ToolStatus::missing("bear");
        assert_eq!(status.state, ToolState::Missing);
        assert!(status.resolved_path.is_none());
        assert!(status.detected_version.is_none());
        assert!(status.message.contains("bear"));
        assert_eq!(status.version_label(), "-");
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&ToolState::ProbeFailed).unwrap();
        assert_eq!(json, "\"probe_failed\"");
    }
}
