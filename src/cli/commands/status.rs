//! Status command implementation.
//!
//! The `cfgtool status` command classifies every tool and shows the plan
//! a run would execute, without cloning or installing anything.

use crate::cli::args::StatusArgs;
use crate::error::{CfgError, Result};
use crate::runner::StatusReport;
use crate::ui::{StatusKind, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{show_remediations, status_table};
use super::wiring::with_bootstrapper;

/// The status command implementation.
pub struct StatusCommand {
    context: CommandContext,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(context: CommandContext, args: StatusArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;
        let report = with_bootstrapper(&config, &self.context.working_dir, false, |b| b.status())?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| CfgError::Other(e.into()))?;
            ui.message(&json);
        } else {
            show_report(ui, &report);
        }

        Ok(if report.all_satisfied() {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}

fn show_report(ui: &mut dyn UserInterface, report: &StatusReport) {
    ui.show_header("Tool status");
    ui.message(&status_table(&report.statuses).render());

    if report.plan.is_empty() {
        ui.success("Every tool is satisfied");
        return;
    }

    ui.message("");
    ui.message("A run would install, in order:");
    for planned in &report.plan {
        match &planned.skip_reason {
            Some(reason) => ui.status(
                StatusKind::Skipped,
                &format!("{} (skipped: {})", planned.identifier, reason),
            ),
            None => ui.status(StatusKind::Pending, &planned.identifier),
        }
    }
    show_remediations(ui, &report.remediations);
}
