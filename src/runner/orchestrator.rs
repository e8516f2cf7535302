//! Installation plan execution.
//!
//! Every plan entry produces exactly one [`InstallationResult`]. A failure
//! does not stop the run; it only causes dependents to be skipped.

use crate::error::CfgError;
use crate::requirements::installer::{InstallAttempt, Installer};
use crate::requirements::planner::{InstallationPlan, PlanEntry};
use crate::requirements::registry::RequirementRegistry;
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Outcome of one planned install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Succeeded,
    Failed,
    Skipped,
    NotImplemented,
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstallOutcome::Succeeded => "installed",
            InstallOutcome::Failed => "failed",
            InstallOutcome::Skipped => "skipped",
            InstallOutcome::NotImplemented => "no installer",
        })
    }
}

/// Result of one planned install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationResult {
    pub identifier: String,
    pub outcome: InstallOutcome,
    pub message: String,
}

impl InstallationResult {
    fn new(identifier: &str, outcome: InstallOutcome, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.to_string(),
            outcome,
            message: message.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == InstallOutcome::Succeeded
    }

    pub fn skipped(&self) -> bool {
        self.outcome == InstallOutcome::Skipped
    }
}

/// True when every result that was not skipped succeeded.
///
/// An empty list succeeds.
pub fn all_succeeded(results: &[InstallationResult]) -> bool {
    results
        .iter()
        .filter(|r| !r.skipped())
        .all(InstallationResult::succeeded)
}

/// Progress of [`InstallationOrchestrator::execute_with_progress`].
#[derive(Debug)]
pub enum InstallEvent<'a> {
    /// `tool` is about to run; `index` counts from zero.
    Starting {
        tool: &'a str,
        index: usize,
        total: usize,
    },
    /// A plan entry finished, skipped or not.
    Finished { result: &'a InstallationResult },
}

/// Runs installers over a plan.
pub struct InstallationOrchestrator<'a> {
    registry: &'a RequirementRegistry,
    installer: &'a dyn Installer,
}

impl<'a> InstallationOrchestrator<'a> {
    pub fn new(registry: &'a RequirementRegistry, installer: &'a dyn Installer) -> Self {
        Self {
            registry,
            installer,
        }
    }

    /// Execute every entry in order.
    pub fn execute(&self, plan: &InstallationPlan) -> Vec<InstallationResult> {
        self.execute_with_progress(plan, |_| {})
    }

    /// Execute every entry in order, reporting each start and finish.
    pub fn execute_with_progress(
        &self,
        plan: &InstallationPlan,
        mut on_event: impl FnMut(InstallEvent<'_>),
    ) -> Vec<InstallationResult> {
        let total = plan.len();
        let mut results = Vec::with_capacity(total);
        for (index, entry) in plan.entries().iter().enumerate() {
            on_event(InstallEvent::Starting {
                tool: entry.identifier(),
                index,
                total,
            });
            let result = self.execute_entry(entry, &results);
            on_event(InstallEvent::Finished { result: &result });
            results.push(result);
        }
        results
    }

    /// Execute one entry given the results recorded so far this run.
    fn execute_entry(
        &self,
        entry: &PlanEntry,
        earlier: &[InstallationResult],
    ) -> InstallationResult {
        let tool = entry.identifier();

        if let Some(reason) = &entry.skip_reason {
            tracing::info!("Skipping {}: {}", tool, reason);
            return InstallationResult::new(
                tool,
                InstallOutcome::Skipped,
                format!("Skipped '{}': {}", tool, reason),
            );
        }

        let blocked = entry.prerequisites.iter().find(|p| {
            earlier
                .iter()
                .any(|r| &r.identifier == *p && !r.succeeded())
        });
        if let Some(prerequisite) = blocked {
            let err = CfgError::PrerequisiteSkipped {
                tool: tool.to_string(),
                prerequisite: prerequisite.clone(),
            };
            tracing::info!("{}", err);
            return InstallationResult::new(tool, InstallOutcome::Skipped, err.to_string());
        }

        let Some(requirement) = self.registry.get(tool) else {
            return InstallationResult::new(
                tool,
                InstallOutcome::NotImplemented,
                format!("No installer is configured for '{}'", tool),
            );
        };

        tracing::info!("Installing {}", tool);
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.installer.install(requirement)));

        match attempt {
            Ok(Ok(InstallAttempt::Installed)) => {
                InstallationResult::new(tool, InstallOutcome::Succeeded, format!("Installed {}", tool))
            }
            Ok(Ok(InstallAttempt::NotImplemented)) => InstallationResult::new(
                tool,
                InstallOutcome::NotImplemented,
                format!(
                    "No automated install for '{}'. {}",
                    tool,
                    requirement.remediation()
                ),
            ),
            Ok(Err(e)) => {
                tracing::warn!("{}", e);
                InstallationResult::new(
                    tool,
                    InstallOutcome::Failed,
                    format!("{}. {}", e, requirement.remediation()),
                )
            }
            Err(_) => {
                tracing::warn!("installer for '{}' panicked", tool);
                let err = CfgError::InstallerFailure {
                    tool: tool.to_string(),
                    message: "installer panicked".to_string(),
                };
                InstallationResult::new(
                    tool,
                    InstallOutcome::Failed,
                    format!("{}. {}", err, requirement.remediation()),
                )
            }
        }
    }
}
