//! Tool classification and installation planning.
//!
//! The [`DependencyPlanner`] looks at the host once per run: every
//! requirement is located and probed, then the non-satisfied ones are put
//! in an order where prerequisites come first.

use crate::error::Result;
use crate::requirements::locator::BinaryLocator;
use crate::requirements::probe::VersionProbe;
use crate::requirements::registry::{RequirementRegistry, ToolRequirement};
use crate::requirements::status::{ToolState, ToolStatus};
use crate::runner::dependency::DependencyGraph;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

/// A single tool in an installation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Classification that put the tool in the plan.
    pub status: ToolStatus,
    /// Direct prerequisites of the tool.
    pub prerequisites: Vec<String>,
    /// Set when the install is known to be impossible before it starts.
    pub skip_reason: Option<String>,
}

impl PlanEntry {
    /// Tool identifier.
    pub fn identifier(&self) -> &str {
        &self.status.identifier
    }

    /// Whether the entry was skipped at planning time.
    pub fn is_pre_skipped(&self) -> bool {
        self.skip_reason.is_some()
    }
}

/// Ordered list of tools to install.
///
/// Never contains a satisfied tool; every prerequisite in the plan precedes
/// its dependents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationPlan {
    entries: Vec<PlanEntry>,
}

impl InstallationPlan {
    /// Entries in execution order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Identifiers in execution order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.entries.iter().map(PlanEntry::identifier).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to install.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classifies tools and derives installation plans.
pub struct DependencyPlanner<'a> {
    registry: &'a RequirementRegistry,
    graph: DependencyGraph,
    locator: &'a dyn BinaryLocator,
    probe: &'a dyn VersionProbe,
}

impl<'a> DependencyPlanner<'a> {
    /// Create a planner over a registry.
    ///
    /// Fails if a prerequisite names an unknown tool or the prerequisites
    /// form a cycle.
    pub fn new(
        registry: &'a RequirementRegistry,
        locator: &'a dyn BinaryLocator,
        probe: &'a dyn VersionProbe,
    ) -> Result<Self> {
        let graph = registry
            .iter()
            .fold(DependencyGraph::builder(), |b, req| {
                b.add_tool(req.identifier.clone(), req.prerequisites.clone())
            })
            .build()?;
        graph.topological_order()?;

        Ok(Self {
            registry,
            graph,
            locator,
            probe,
        })
    }

    /// Classify every requirement, in declaration order.
    pub fn classify(&self) -> Vec<ToolStatus> {
        self.registry.iter().map(|r| self.classify_one(r)).collect()
    }

    /// Classify a single requirement.
    pub fn classify_one(&self, requirement: &ToolRequirement) -> ToolStatus {
        let tool = requirement.identifier.as_str();

        let Some(resolved) = self.locator.locate(tool) else {
            let mut status = ToolStatus::missing(tool);
            status.minimum_version = requirement.minimum_version;
            return status;
        };

        let mut status = ToolStatus {
            identifier: tool.to_string(),
            resolved_path: Some(resolved.clone()),
            detected_version: None,
            minimum_version: requirement.minimum_version,
            state: ToolState::Satisfied,
            message: String::new(),
        };

        let probed = panic::catch_unwind(AssertUnwindSafe(|| {
            self.probe.probe(requirement, &resolved)
        }));

        let detected = match probed {
            Ok(Ok(version)) => version,
            Ok(Err(e)) => {
                tracing::warn!("{}", e);
                status.state = ToolState::ProbeFailed;
                status.message = e.to_string();
                return status;
            }
            Err(_) => {
                tracing::warn!("version probe for '{}' panicked", tool);
                status.state = ToolState::ProbeFailed;
                status.message = format!("Could not read the version of '{}': probe panicked", tool);
                return status;
            }
        };
        status.detected_version = detected;

        match (detected, requirement.minimum_version) {
            (Some(found), Some(minimum)) if found < minimum => {
                status.state = ToolState::Outdated;
                status.message = format!(
                    "'{}' {} is older than the required {}",
                    tool, found, minimum
                );
            }
            (Some(found), _) => {
                status.message = format!("'{}' {} found at {}", tool, found, resolved.display());
            }
            (None, _) => {
                status.message = format!("'{}' found at {}", tool, resolved.display());
            }
        }

        tracing::debug!("classified {} as {}", tool, status.state);
        status
    }

    /// Build an installation plan from classified statuses.
    pub fn plan(&self, statuses: &[ToolStatus]) -> Result<InstallationPlan> {
        let by_id: HashMap<&str, &ToolStatus> = statuses
            .iter()
            .filter(|s| !s.is_satisfied())
            .map(|s| (s.identifier.as_str(), s))
            .collect();

        let members: HashSet<&str> = by_id.keys().copied().collect();
        let order = self.graph.order_subset(&members)?;

        let mut skipped: HashSet<String> = HashSet::new();
        let mut entries = Vec::with_capacity(order.len());

        for id in order {
            let Some(status) = by_id.get(id.as_str()) else {
                continue;
            };
            let prerequisites = self.graph.prerequisites_of(&id).to_vec();

            let skip_reason = prerequisites.iter().find_map(|p| {
                let prereq = by_id.get(p.as_str())?;
                if skipped.contains(p) {
                    Some(format!("prerequisite '{}' was skipped", p))
                } else if prereq.state == ToolState::ProbeFailed {
                    Some(format!("prerequisite '{}' could not be probed", p))
                } else if self.registry.get(p).is_some_and(|r| r.install.is_none()) {
                    Some(format!("prerequisite '{}' has no install recipe", p))
                } else {
                    None
                }
            });

            if let Some(reason) = &skip_reason {
                tracing::debug!("pre-skipping {}: {}", id, reason);
                skipped.insert(id.clone());
            }

            entries.push(PlanEntry {
                status: (*status).clone(),
                prerequisites,
                skip_reason,
            });
        }

        Ok(InstallationPlan { entries })
    }
}
