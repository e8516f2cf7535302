//! Planning, installation and the end-to-end bootstrap run.

pub mod bootstrap;
pub mod dependency;
pub mod orchestrator;

pub use bootstrap::{
    BootstrapOptions, BootstrapProgress, Bootstrapper, PlannedTool, RepositoryReport,
    RepositoryState, RunReport, StatusReport,
};
pub use dependency::{DependencyGraph, DependencyGraphBuilder};
pub use orchestrator::{
    all_succeeded, InstallEvent, InstallOutcome, InstallationOrchestrator, InstallationResult,
};
