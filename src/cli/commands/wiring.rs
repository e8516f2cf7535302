//! Production collaborators for a bootstrap run.

use std::path::Path;

use crate::config::CfgConfig;
use crate::error::Result;
use crate::links::LinkManager;
use crate::repository::GitGateway;
use crate::requirements::installer::{bind_named_repository, run_recipe_command};
use crate::requirements::{
    CommandProbe, InstallerContext, RecipeInstaller, RequirementRegistry, SearchPathLocator,
};
use crate::runner::Bootstrapper;

/// Build real collaborators for `config` and hand a [`Bootstrapper`] to `f`.
///
/// Relative roots in `config` resolve against `working_dir`.
pub fn with_bootstrapper<T>(
    config: &CfgConfig,
    working_dir: &Path,
    overwrite_links: bool,
    f: impl FnOnce(&Bootstrapper<'_>) -> Result<T>,
) -> Result<T> {
    let registry = RequirementRegistry::new(config.requirements());
    let repositories = config.repository_specs(working_dir);
    let locator = SearchPathLocator::from_env();
    let probe = CommandProbe::new();
    let gateway = GitGateway::new();
    let link_manager = LinkManager::for_current_user(overwrite_links)?;

    let bind_repository = |name: &str| bind_named_repository(&gateway, &repositories, name);
    let installer = RecipeInstaller::new(InstallerContext {
        run_command: &run_recipe_command,
        bind_repository: &bind_repository,
    });

    tracing::debug!(
        "Search path has {} entries, deps root {}",
        locator.entries().len(),
        working_dir.join(&config.deps_root).display()
    );

    let bootstrapper = Bootstrapper {
        registry: &registry,
        repositories: &repositories,
        links: &config.links,
        locator: &locator,
        probe: &probe,
        gateway: &gateway,
        installer: &installer,
        link_manager: &link_manager,
    };
    f(&bootstrapper)
}
