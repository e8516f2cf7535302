//! Shared display helpers for tool, install and link results.
//!
//! Used by `run` and `status` so both render states the same way.

use crate::links::{LinkReport, LinkState};
use crate::requirements::ToolStatus;
use crate::runner::{InstallationResult, RepositoryReport, RepositoryState};
use crate::ui::{StatusKind, Table, UserInterface};

/// One-line description of a tool status: `vim 8.2 (>= 8.1)`.
pub fn describe_tool(status: &ToolStatus) -> String {
    let mut line = status.identifier.clone();
    if let Some(found) = status.detected_version {
        line.push_str(&format!(" {}", found));
    }
    if let Some(minimum) = status.minimum_version {
        line.push_str(&format!(" (>= {})", minimum));
    }
    if !status.is_satisfied() {
        line.push_str(&format!(": {}", status.message));
    }
    line
}

/// Print one status line per tool.
pub fn show_tool_statuses(ui: &mut dyn UserInterface, statuses: &[ToolStatus]) {
    for status in statuses {
        ui.status(StatusKind::from(status.state), &describe_tool(status));
    }
}

/// Table of tool statuses for `status`.
pub fn status_table(statuses: &[ToolStatus]) -> Table {
    let mut table = Table::new(["Tool", "State", "Found", "Minimum", "Path"]);
    for status in statuses {
        table.add_row([
            status.identifier.clone(),
            status.state.to_string(),
            status.version_label(),
            status
                .minimum_version
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status
                .resolved_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

/// Status kind for a repository line.
pub fn repository_kind(report: &RepositoryReport) -> StatusKind {
    match report.state {
        RepositoryState::Bound | RepositoryState::Cloned => StatusKind::Success,
        RepositoryState::Failed => StatusKind::Failed,
    }
}

/// Status kind for a link line.
pub fn link_kind(report: &LinkReport) -> StatusKind {
    match report.state {
        LinkState::Created | LinkState::AlreadyLinked | LinkState::Replaced => StatusKind::Success,
        LinkState::Conflict => StatusKind::Warning,
        LinkState::Skipped => StatusKind::Skipped,
        LinkState::Failed => StatusKind::Failed,
    }
}

/// Print one line per install result.
pub fn show_install_results(ui: &mut dyn UserInterface, results: &[InstallationResult]) {
    for result in results {
        ui.status(
            StatusKind::from(result.outcome),
            &format!("{}: {}", result.identifier, result.message),
        );
    }
}

/// Print the remediation block, if any.
pub fn show_remediations(ui: &mut dyn UserInterface, remediations: &[String]) {
    if remediations.is_empty() {
        return;
    }
    ui.message("");
    ui.message("To finish by hand:");
    for line in remediations {
        ui.message(&format!("  {}", line));
    }
}
