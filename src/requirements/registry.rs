//! Tool requirement definitions.
//!
//! Defines which tools the environment needs, how to read their versions,
//! and how to install them. Requirements are built once from configuration
//! and never change during a run.

use crate::requirements::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How to read a tool's version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeStrategy {
    /// Take a whitespace-delimited token from the first output line.
    ///
    /// `vim --version` prints `VIM - Vi IMproved 8.2 (...)`, token 4.
    Field {
        index: usize,
        #[serde(default = "default_probe_args")]
        args: Vec<String>,
    },

    /// Find the first `vMAJOR.MINOR` token anywhere in the output.
    Banner {
        #[serde(default = "default_probe_args")]
        args: Vec<String>,
    },

    /// Do not run the tool; being on PATH is enough.
    Presence,
}

impl Default for ProbeStrategy {
    fn default() -> Self {
        ProbeStrategy::Banner {
            args: default_probe_args(),
        }
    }
}

fn default_probe_args() -> Vec<String> {
    vec!["--version".to_string()]
}

/// How to install a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstallRecipe {
    /// Run a single shell command.
    Shell { command: String },

    /// Bind or clone a repository, then run build commands inside it.
    Source {
        repository: String,
        #[serde(default)]
        build: Vec<String>,
    },
}

/// A required tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    /// Tool identifier, also the binary name looked up on PATH.
    pub identifier: String,
    /// Minimum acceptable version, if any.
    pub minimum_version: Option<Version>,
    /// Tools that must be usable before this one can be installed.
    pub prerequisites: Vec<String>,
    /// Version probe strategy.
    pub probe: ProbeStrategy,
    /// Install recipe; `None` means no automated install exists.
    pub install: Option<InstallRecipe>,
    /// Manual install command shown when the tool is not satisfied.
    pub manual_hint: Option<String>,
}

impl ToolRequirement {
    /// A requirement with no minimum, no prerequisites and the default probe.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            minimum_version: None,
            prerequisites: Vec::new(),
            probe: ProbeStrategy::default(),
            install: None,
            manual_hint: None,
        }
    }

    /// Set the minimum version.
    pub fn with_minimum(mut self, minimum: Version) -> Self {
        self.minimum_version = Some(minimum);
        self
    }

    /// Add a prerequisite tool.
    pub fn requires(mut self, prerequisite: impl Into<String>) -> Self {
        self.prerequisites.push(prerequisite.into());
        self
    }

    /// Set the probe strategy.
    pub fn with_probe(mut self, probe: ProbeStrategy) -> Self {
        self.probe = probe;
        self
    }

    /// Set the install recipe.
    pub fn with_install(mut self, recipe: InstallRecipe) -> Self {
        self.install = Some(recipe);
        self
    }

    /// Set the manual install hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.manual_hint = Some(hint.into());
        self
    }

    /// One-line remediation naming the tool and how to install it by hand.
    pub fn remediation(&self) -> String {
        match &self.manual_hint {
            Some(hint) => format!("Install {} manually: {}", self.identifier, hint),
            None => format!(
                "Install {} manually with your system package manager",
                self.identifier
            ),
        }
    }
}

/// Ordered set of tool requirements, looked up by identifier.
#[derive(Debug, Clone, Default)]
pub struct RequirementRegistry {
    requirements: Vec<ToolRequirement>,
    index: HashMap<String, usize>,
}

impl RequirementRegistry {
    /// Build a registry; later duplicates replace earlier definitions in place.
    pub fn new(requirements: impl IntoIterator<Item = ToolRequirement>) -> Self {
        let mut registry = Self::default();
        for req in requirements {
            registry.insert(req);
        }
        registry
    }

    fn insert(&mut self, req: ToolRequirement) {
        if let Some(&idx) = self.index.get(&req.identifier) {
            self.requirements[idx] = req;
        } else {
            self.index
                .insert(req.identifier.clone(), self.requirements.len());
            self.requirements.push(req);
        }
    }

    /// Get a requirement by identifier.
    pub fn get(&self, identifier: &str) -> Option<&ToolRequirement> {
        self.index.get(identifier).map(|&i| &self.requirements[i])
    }

    /// Requirements in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolRequirement> {
        self.requirements.iter()
    }

    /// Position of a requirement in declaration order.
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    /// Number of requirements.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}
