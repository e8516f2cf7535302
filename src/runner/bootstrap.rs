//! End-to-end bootstrap run.
//!
//! A run has four stages: bind or clone repositories, classify tools and
//! plan installs, execute the plan, then wire links into the home
//! directory. Links are only written when every earlier stage succeeded.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::links::{LinkManager, LinkReport, LinkSpec};
use crate::repository::{RepositoryGateway, RepositoryOrigin, RepositorySpec};
use crate::requirements::{
    BinaryLocator, DependencyPlanner, InstallationPlan, Installer, RequirementRegistry,
    ToolStatus, VersionProbe,
};

use super::orchestrator::{
    all_succeeded, InstallEvent, InstallationOrchestrator, InstallationResult,
};

/// Options for a bootstrap run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Classify and plan only; touch nothing.
    pub dry_run: bool,
    /// Do not write links.
    pub skip_links: bool,
    /// Do not bind or clone repositories up front.
    pub skip_repos: bool,
}

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum BootstrapProgress<'a> {
    /// A repository is about to be bound or cloned.
    RepositoryStarting { spec: &'a RepositorySpec },
    /// A repository finished.
    RepositoryFinished { report: &'a RepositoryReport },
    /// Every tool has been classified.
    Classified { statuses: &'a [ToolStatus] },
    /// The installation plan is known.
    Planned { plan: &'a InstallationPlan },
    /// An install is about to start.
    InstallStarting {
        tool: &'a str,
        index: usize,
        total: usize,
    },
    /// An install finished.
    InstallFinished { result: &'a InstallationResult },
    /// A link was applied or skipped.
    Linked { report: &'a LinkReport },
}

/// Final state of a repository in a run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryState {
    Bound,
    Cloned,
    Failed,
}

impl From<RepositoryOrigin> for RepositoryState {
    fn from(origin: RepositoryOrigin) -> Self {
        match origin {
            RepositoryOrigin::Bound => RepositoryState::Bound,
            RepositoryOrigin::Cloned => RepositoryState::Cloned,
        }
    }
}

/// One line of the repository report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReport {
    pub name: String,
    pub path: PathBuf,
    pub state: RepositoryState,
    pub head: Option<String>,
    pub message: String,
}

impl RepositoryReport {
    pub fn is_failure(&self) -> bool {
        self.state == RepositoryState::Failed
    }
}

/// Everything a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub dry_run: bool,
    pub repositories: Vec<RepositoryReport>,
    pub statuses: Vec<ToolStatus>,
    pub plan: Vec<String>,
    pub installs: Vec<InstallationResult>,
    pub links: Vec<LinkReport>,
    /// One manual install instruction per tool still not satisfied.
    pub remediations: Vec<String>,
}

fn serialize_millis<S: Serializer>(duration: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}

impl RunReport {
    /// Whether every mandatory stage succeeded.
    pub fn success(&self) -> bool {
        !self.repositories.iter().any(RepositoryReport::is_failure)
            && all_succeeded(&self.installs)
            && !self.links.iter().any(LinkReport::is_failure)
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Classification and plan without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub statuses: Vec<ToolStatus>,
    pub plan: Vec<PlannedTool>,
    pub remediations: Vec<String>,
}

/// A plan entry in a [`StatusReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTool {
    pub identifier: String,
    pub prerequisites: Vec<String>,
    pub skip_reason: Option<String>,
}

impl StatusReport {
    /// Whether every tool is satisfied.
    pub fn all_satisfied(&self) -> bool {
        self.statuses.iter().all(ToolStatus::is_satisfied)
    }
}

/// Collaborators for a run.
pub struct Bootstrapper<'a> {
    pub registry: &'a RequirementRegistry,
    pub repositories: &'a [RepositorySpec],
    pub links: &'a [LinkSpec],
    pub locator: &'a dyn BinaryLocator,
    pub probe: &'a dyn VersionProbe,
    pub gateway: &'a dyn RepositoryGateway,
    pub installer: &'a dyn Installer,
    pub link_manager: &'a LinkManager,
}

impl<'a> Bootstrapper<'a> {
    /// Classify and plan without running anything but version probes.
    pub fn status(&self) -> Result<StatusReport> {
        let planner = DependencyPlanner::new(self.registry, self.locator, self.probe)?;
        let statuses = planner.classify();
        let plan = planner.plan(&statuses)?;

        Ok(StatusReport {
            remediations: self.remediations(&statuses),
            plan: plan
                .entries()
                .iter()
                .map(|e| PlannedTool {
                    identifier: e.identifier().to_string(),
                    prerequisites: e.prerequisites.clone(),
                    skip_reason: e.skip_reason.clone(),
                })
                .collect(),
            statuses,
        })
    }

    /// Run every stage.
    pub fn run(&self, options: BootstrapOptions) -> Result<RunReport> {
        self.run_with_progress(options, |_| {})
    }

    /// Run every stage, reporting progress.
    pub fn run_with_progress(
        &self,
        options: BootstrapOptions,
        mut on_progress: impl FnMut(BootstrapProgress<'_>),
    ) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        // Planning fails fast on a bad graph, before anything is cloned.
        let planner = DependencyPlanner::new(self.registry, self.locator, self.probe)?;

        let repositories = if options.dry_run || options.skip_repos {
            Vec::new()
        } else {
            self.sync_repositories(&mut on_progress)
        };

        tracing::info!("Classifying {} tools", self.registry.len());
        let statuses = planner.classify();
        on_progress(BootstrapProgress::Classified {
            statuses: &statuses,
        });

        let plan = planner.plan(&statuses)?;
        on_progress(BootstrapProgress::Planned { plan: &plan });

        let installs = if options.dry_run {
            Vec::new()
        } else {
            self.execute_plan(&plan, &mut on_progress)
        };

        let ready = !repositories.iter().any(RepositoryReport::is_failure)
            && all_succeeded(&installs);
        let skip_reason = if options.dry_run {
            Some("dry run")
        } else if options.skip_links {
            Some("--skip-links")
        } else if !ready {
            Some("an earlier stage failed")
        } else {
            None
        };
        let links = self.apply_links(skip_reason, &mut on_progress);

        let final_statuses = if options.dry_run || installs.is_empty() {
            statuses.clone()
        } else {
            tracing::info!("Re-classifying after installs");
            planner.classify()
        };

        Ok(RunReport {
            started_at,
            duration: start.elapsed(),
            dry_run: options.dry_run,
            repositories,
            remediations: self.remediations(&final_statuses),
            statuses: final_statuses,
            plan: plan.identifiers().into_iter().map(String::from).collect(),
            installs,
            links,
        })
    }

    fn sync_repositories(
        &self,
        on_progress: &mut impl FnMut(BootstrapProgress<'_>),
    ) -> Vec<RepositoryReport> {
        let mut reports = Vec::with_capacity(self.repositories.len());

        for spec in self.repositories {
            on_progress(BootstrapProgress::RepositoryStarting { spec });
            let report = match self.gateway.bind_or_clone(spec) {
                Ok(handle) => RepositoryReport {
                    message: match handle.origin {
                        RepositoryOrigin::Bound => format!("bound {}", handle.path.display()),
                        RepositoryOrigin::Cloned => {
                            format!("cloned {} into {}", spec.remote_url, handle.path.display())
                        }
                    },
                    name: handle.name,
                    path: handle.path,
                    state: handle.origin.into(),
                    head: handle.head,
                },
                Err(e) => {
                    tracing::warn!("{}", e);
                    RepositoryReport {
                        name: spec.name.clone(),
                        path: spec.local_path(),
                        state: RepositoryState::Failed,
                        head: None,
                        message: e.to_string(),
                    }
                }
            };
            on_progress(BootstrapProgress::RepositoryFinished { report: &report });
            reports.push(report);
        }

        reports
    }

    fn execute_plan(
        &self,
        plan: &InstallationPlan,
        on_progress: &mut impl FnMut(BootstrapProgress<'_>),
    ) -> Vec<InstallationResult> {
        InstallationOrchestrator::new(self.registry, self.installer).execute_with_progress(
            plan,
            |event| match event {
                InstallEvent::Starting { tool, index, total } => {
                    on_progress(BootstrapProgress::InstallStarting { tool, index, total })
                }
                InstallEvent::Finished { result } => {
                    on_progress(BootstrapProgress::InstallFinished { result })
                }
            },
        )
    }

    fn apply_links(
        &self,
        skip_reason: Option<&str>,
        on_progress: &mut impl FnMut(BootstrapProgress<'_>),
    ) -> Vec<LinkReport> {
        self.links
            .iter()
            .map(|link| {
                let repo_path = self.repository_path(&link.repository);
                let report = match skip_reason {
                    Some(reason) => self.link_manager.skip(link, &repo_path, reason),
                    None => self.link_manager.apply(link, &repo_path),
                };
                on_progress(BootstrapProgress::Linked { report: &report });
                report
            })
            .collect()
    }

    fn repository_path(&self, name: &str) -> PathBuf {
        self.repositories
            .iter()
            .find(|r| r.name == name)
            .map(RepositorySpec::local_path)
            .unwrap_or_else(|| PathBuf::from(name))
    }

    fn remediations(&self, statuses: &[ToolStatus]) -> Vec<String> {
        statuses
            .iter()
            .filter(|s| !s.is_satisfied())
            .filter_map(|s| self.registry.get(&s.identifier))
            .map(|req| req.remediation())
            .collect()
    }
}
