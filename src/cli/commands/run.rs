//! Run command implementation.
//!
//! The `cfgtool run` command bootstraps the environment: repositories,
//! tool installs, then links.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::runner::{BootstrapOptions, BootstrapProgress, RunReport};
use crate::ui::{format_duration, SpinnerHandle, StatusKind, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::{
    link_kind, repository_kind, show_install_results, show_remediations, show_tool_statuses,
};
use super::wiring::with_bootstrapper;

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn options(&self) -> BootstrapOptions {
        BootstrapOptions {
            dry_run: self.args.dry_run,
            skip_links: self.args.skip_links,
            skip_repos: self.args.skip_repos,
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;
        let options = self.options();

        ui.show_header(if options.dry_run {
            "cfgtool (dry run)"
        } else {
            "cfgtool"
        });

        let report = with_bootstrapper(
            &config,
            &self.context.working_dir,
            self.args.overwrite_links,
            |bootstrapper| {
                let mut spinner: Option<Box<dyn SpinnerHandle>> = None;
                bootstrapper.run_with_progress(options, |event| {
                    render_progress(ui, &mut spinner, event)
                })
            },
        )?;

        show_summary(ui, &report);

        Ok(if report.success() {
            CommandResult::success()
        } else {
            CommandResult::failure(report.exit_code())
        })
    }
}

fn render_progress(
    ui: &mut dyn UserInterface,
    spinner: &mut Option<Box<dyn SpinnerHandle>>,
    event: BootstrapProgress<'_>,
) {
    match event {
        BootstrapProgress::RepositoryStarting { spec } => {
            *spinner = Some(ui.start_spinner(&format!("Syncing {}", spec.name)));
        }
        BootstrapProgress::RepositoryFinished { report } => {
            let line = format!("{}: {}", report.name, report.message);
            match spinner.take() {
                Some(mut s) if report.is_failure() => s.finish_error(&line),
                Some(mut s) => s.finish_success(&line),
                None => ui.status(repository_kind(report), &line),
            }
        }
        BootstrapProgress::Classified { statuses } => {
            ui.message("Tools:");
            show_tool_statuses(ui, statuses);
        }
        BootstrapProgress::Planned { plan } => {
            if plan.is_empty() {
                ui.success("Every tool is satisfied");
            } else {
                ui.message(&format!("Plan: {}", plan.identifiers().join(", ")));
            }
        }
        BootstrapProgress::InstallStarting { tool, index, total } => {
            *spinner = Some(ui.start_spinner(&format!(
                "[{}/{}] Installing {}",
                index + 1,
                total,
                tool
            )));
        }
        BootstrapProgress::InstallFinished { result } => {
            let line = format!("{}: {}", result.identifier, result.message);
            match spinner.take() {
                Some(mut s) if result.succeeded() => s.finish_success(&line),
                Some(mut s) if result.skipped() => s.finish_skipped(&line),
                Some(mut s) => s.finish_error(&line),
                None => show_install_results(ui, std::slice::from_ref(result)),
            }
        }
        BootstrapProgress::Linked { report } => {
            ui.status(link_kind(report), &report.message);
        }
    }
}

fn show_summary(ui: &mut dyn UserInterface, report: &RunReport) {
    show_remediations(ui, &report.remediations);
    ui.message("");

    let elapsed = format_duration(report.duration);
    if report.dry_run {
        ui.status(
            StatusKind::Pending,
            &format!("Dry run: {} tool(s) would be installed", report.plan.len()),
        );
    } else if report.success() {
        ui.success(&format!("Environment ready in {}", elapsed));
    } else {
        let failed = report
            .installs
            .iter()
            .filter(|r| !r.succeeded() && !r.skipped())
            .count();
        ui.error(&format!(
            "Bootstrap incomplete after {}: {} install(s) did not succeed",
            elapsed, failed
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::InstallationResult;
    use crate::runner::InstallOutcome;
    use crate::ui::MockUI;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn report(installs: Vec<InstallationResult>, dry_run: bool) -> RunReport {
        RunReport {
            started_at: chrono::Utc::now(),
            duration: Duration::from_millis(1200),
            dry_run,
            repositories: Vec::new(),
            statuses: Vec::new(),
            plan: installs.iter().map(|r| r.identifier.clone()).collect(),
            installs,
            links: Vec::new(),
            remediations: vec!["Install vim manually: sudo apt-get install vim".to_string()],
        }
    }

    #[test]
    fn summary_counts_failures() {
        let mut ui = MockUI::new();
        let installs = vec![
            InstallationResult {
                identifier: "vim".to_string(),
                outcome: InstallOutcome::NotImplemented,
                message: "No automated install for 'vim'".to_string(),
            },
            InstallationResult {
                identifier: "bear".to_string(),
                outcome: InstallOutcome::Succeeded,
                message: "installed".to_string(),
            },
        ];

        show_summary(&mut ui, &report(installs, false));

        assert!(ui.has_error("1 install(s) did not succeed"));
        assert!(ui.has_message("sudo apt-get install vim"));
    }

    #[test]
    fn summary_for_dry_run() {
        let mut ui = MockUI::new();
        show_summary(&mut ui, &report(Vec::new(), true));
        assert!(ui.has_status(StatusKind::Pending, "Dry run: 0 tool(s)"));
    }

    #[test]
    fn invalid_config_propagates_as_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("cfgtool.yml"), "tools: [").unwrap();

        let cmd = RunCommand::new(CommandContext::new(temp.path()), RunArgs::default());
        let err = cmd.execute(&mut MockUI::new()).unwrap_err();
        assert!(err.is_config_error());
    }
}
