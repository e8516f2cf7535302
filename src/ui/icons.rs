//! Status icons shared by every report.

use super::theme::CfgTheme;
use crate::requirements::ToolState;
use crate::runner::InstallOutcome;

/// Canonical status kinds used across all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Success,
    Failed,
    Skipped,
    Pending,
    Blocked,
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Pending => "◌",
            Self::Blocked => "⊘",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Pending => "[pending]",
            Self::Blocked => "[blocked]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &CfgTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped | Self::Pending => theme.dim.apply_to(icon).to_string(),
            Self::Blocked | Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &CfgTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<ToolState> for StatusKind {
    fn from(state: ToolState) -> Self {
        match state {
            ToolState::Satisfied => Self::Success,
            ToolState::Missing => Self::Failed,
            ToolState::Outdated => Self::Warning,
            ToolState::ProbeFailed => Self::Blocked,
        }
    }
}

impl From<InstallOutcome> for StatusKind {
    fn from(outcome: InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::Succeeded => Self::Success,
            InstallOutcome::Failed => Self::Failed,
            InstallOutcome::Skipped => Self::Skipped,
            InstallOutcome::NotImplemented => Self::Warning,
        }
    }
}
