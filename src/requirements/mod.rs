//! Tool requirements, classification and installation.
//!
//! # Modules
//!
//! - [`registry`] - Declared tools, their probes and install recipes
//! - [`version`] - `MAJOR.MINOR` versions
//! - [`locator`] - Finding binaries on the search path
//! - [`probe`] - Reading a binary's version
//! - [`status`] - Per-tool classification results
//! - [`planner`] - Classification and installation planning
//! - [`installer`] - Carrying out install recipes

pub mod installer;
pub mod locator;
pub mod planner;
pub mod probe;
pub mod registry;
pub mod status;
pub mod version;

pub use installer::{InstallAttempt, Installer, InstallerContext, RecipeInstaller};
pub use locator::{BinaryLocator, SearchPathLocator};
pub use planner::{DependencyPlanner, InstallationPlan, PlanEntry};
pub use probe::{CommandProbe, VersionProbe};
pub use registry::{InstallRecipe, ProbeStrategy, RequirementRegistry, ToolRequirement};
pub use status::{ToolState, ToolStatus};
pub use version::Version;
