//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - `requires` must reference declared tools
//! - Tool prerequisites must not form a cycle
//! - Source recipes and links must reference declared repositories
//! - Repository remotes must not be empty

use crate::config::schema::CfgConfig;
use crate::error::{CfgError, Result};
use crate::requirements::InstallRecipe;
use crate::runner::DependencyGraph;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &CfgConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_tools(config));
    errors.extend(validate_dependencies(config));
    errors.extend(validate_repositories(config));
    errors.extend(validate_links(config));

    errors
}

fn validate_tools(config: &CfgConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, tool) in config.tools.iter() {
        for prerequisite in &tool.requires {
            if !config.tools.contains_key(prerequisite) {
                errors.push(ValidationError::new(
                    "unknown-prerequisite",
                    format!("Tool '{}' requires unknown tool '{}'", name, prerequisite),
                ));
            }
        }

        if let Some(InstallRecipe::Source { repository, .. }) = &tool.install {
            if !config.repositories.contains_key(repository) {
                errors.push(ValidationError::new(
                    "unknown-repository",
                    format!(
                        "Tool '{}' builds from unknown repository '{}'",
                        name, repository
                    ),
                ));
            }
        }
    }

    errors
}

/// Unknown prerequisites are reported separately and left out of the graph.
fn validate_dependencies(config: &CfgConfig) -> Vec<ValidationError> {
    let graph = config
        .tools
        .iter()
        .fold(DependencyGraph::builder(), |builder, (name, tool)| {
            let known = tool
                .requires
                .iter()
                .filter(|p| config.tools.contains_key(p))
                .cloned()
                .collect();
            builder.add_tool(name.clone(), known)
        })
        .build();

    match graph {
        Ok(graph) => graph
            .find_cycle()
            .map(|cycle| {
                ValidationError::new(
                    "circular-dependency",
                    format!("Circular dependency detected: {}", cycle.join(" -> ")),
                )
            })
            .into_iter()
            .collect(),
        Err(e) => vec![ValidationError::new("invalid-graph", e.to_string())],
    }
}

fn validate_repositories(config: &CfgConfig) -> Vec<ValidationError> {
    config
        .repositories
        .iter()
        .filter(|(_, repo)| repo.remote.trim().is_empty())
        .map(|(name, _)| {
            ValidationError::new(
                "empty-remote",
                format!("Repository '{}' has an empty remote", name),
            )
        })
        .collect()
}

fn validate_links(config: &CfgConfig) -> Vec<ValidationError> {
    config
        .links
        .iter()
        .filter(|link| !config.repositories.contains_key(&link.repository))
        .map(|link| {
            ValidationError::new(
                "unknown-repository",
                format!(
                    "Link to '{}' uses unknown repository '{}'",
                    link.target, link.repository
                ),
            )
        })
        .collect()
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &CfgConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(CfgError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
