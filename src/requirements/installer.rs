//! Tool installers.
//!
//! A [`RecipeInstaller`] carries out a requirement's [`InstallRecipe`]:
//! either a single shell command or a source build inside a cloned
//! repository. Side effects go through an [`InstallerContext`] so tests can
//! substitute them.

use crate::error::{CfgError, Result};
use crate::repository::{RepositoryGateway, RepositorySpec};
use crate::requirements::registry::{InstallRecipe, ToolRequirement};
use crate::shell::{execute_checked, CommandOptions};
use std::path::{Path, PathBuf};

/// What an installer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAttempt {
    /// The recipe ran to completion.
    Installed,
    /// The tool has no recipe.
    NotImplemented,
}

/// Installs a single tool.
pub trait Installer {
    /// Install `requirement`. An `Err` means the recipe ran and failed.
    fn install(&self, requirement: &ToolRequirement) -> Result<InstallAttempt>;
}

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Run a shell command, optionally inside a directory.
    pub run_command: &'a dyn Fn(&str, Option<&Path>) -> Result<()>,
    /// Make a named repository available, returning its work tree.
    pub bind_repository: &'a dyn Fn(&str) -> Result<PathBuf>,
}

/// Run a recipe command through the shell, capturing its output.
pub fn run_recipe_command(command: &str, cwd: Option<&Path>) -> Result<()> {
    execute_checked(command, &CommandOptions::captured(cwd)).map(|_| ())
}

/// Bind or clone `name` from `repositories` through `gateway`.
pub fn bind_named_repository(
    gateway: &dyn RepositoryGateway,
    repositories: &[RepositorySpec],
    name: &str,
) -> Result<PathBuf> {
    let spec = repositories
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| CfgError::ConfigValidationError {
            message: format!("unknown repository '{}'", name),
        })?;
    gateway.bind_or_clone(spec).map(|handle| handle.path)
}

/// Installer that executes configured recipes.
pub struct RecipeInstaller<'a> {
    ctx: InstallerContext<'a>,
}

impl<'a> RecipeInstaller<'a> {
    /// Create an installer over the given context.
    pub fn new(ctx: InstallerContext<'a>) -> Self {
        Self { ctx }
    }

    fn failure(requirement: &ToolRequirement, err: CfgError) -> CfgError {
        CfgError::InstallerFailure {
            tool: requirement.identifier.clone(),
            message: err.to_string(),
        }
    }
}

impl Installer for RecipeInstaller<'_> {
    fn install(&self, requirement: &ToolRequirement) -> Result<InstallAttempt> {
        let Some(recipe) = &requirement.install else {
            return Ok(InstallAttempt::NotImplemented);
        };

        match recipe {
            InstallRecipe::Shell { command } => {
                (self.ctx.run_command)(command, None)
                    .map_err(|e| Self::failure(requirement, e))?;
            }
            InstallRecipe::Source { repository, build } => {
                let tree = (self.ctx.bind_repository)(repository)
                    .map_err(|e| Self::failure(requirement, e))?;
                for step in build {
                    tracing::info!("Building {}: {}", requirement.identifier, step);
                    (self.ctx.run_command)(step, Some(&tree))
                        .map_err(|e| Self::failure(requirement, e))?;
                }
            }
        }

        Ok(InstallAttempt::Installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn no_repository(name: &str) -> Result<PathBuf> {
        Err(CfgError::ConfigValidationError {
            message: format!("unknown repository '{}'", name),
        })
    }

    #[test]
    fn missing_recipe_is_not_implemented() {
        let run = |_: &str, _: Option<&Path>| -> Result<()> { panic!("must not run") };
        let installer = RecipeInstaller::new(InstallerContext {
            run_command: &run,
            bind_repository: &no_repository,
        });

        let attempt = installer.install(&ToolRequirement::new("vim")).unwrap();
        assert_eq!(attempt, InstallAttempt::NotImplemented);
    }

    #[test]
    fn shell_recipe_runs_command() {
        let calls = RefCell::new(Vec::new());
        let run = |cmd: &str, cwd: Option<&Path>| -> Result<()> {
            calls.borrow_mut().push((cmd.to_string(), cwd.map(Path::to_path_buf)));
            Ok(())
        };
        let installer = RecipeInstaller::new(InstallerContext {
            run_command: &run,
            bind_repository: &no_repository,
        });

        let req = ToolRequirement::new("bear").with_install(InstallRecipe::Shell {
            command: "sudo apt-get install -y bear".to_string(),
        });
        assert_eq!(installer.install(&req).unwrap(), InstallAttempt::Installed);
        assert_eq!(
            *calls.borrow(),
            vec![("sudo apt-get install -y bear".to_string(), None)]
        );
    }

    #[test]
    fn failed_command_is_installer_failure() {
        let run = |cmd: &str, _: Option<&Path>| -> Result<()> {
            Err(CfgError::CommandFailed {
                command: cmd.to_string(),
                code: Some(100),
            })
        };
        let installer = RecipeInstaller::new(InstallerContext {
            run_command: &run,
            bind_repository: &no_repository,
        });

        let req = ToolRequirement::new("node").with_install(InstallRecipe::Shell {
            command: "false".to_string(),
        });
        let err = installer.install(&req).unwrap_err();
        assert!(matches!(err, CfgError::InstallerFailure { ref tool, .. } if tool == "node"));
    }

    #[test]
    fn source_recipe_builds_inside_clone() {
        let calls = RefCell::new(Vec::new());
        let run = |cmd: &str, cwd: Option<&Path>| -> Result<()> {
            calls.borrow_mut().push((cmd.to_string(), cwd.map(Path::to_path_buf)));
            Ok(())
        };
        let bind = |name: &str| -> Result<PathBuf> { Ok(PathBuf::from("deps").join(name)) };
        let installer = RecipeInstaller::new(InstallerContext {
            run_command: &run,
            bind_repository: &bind,
        });

        let req = ToolRequirement::new("ccls").with_install(InstallRecipe::Source {
            repository: "ccls".to_string(),
            build: vec!["cmake -H. -BRelease".to_string(), "cmake --build Release".to_string()],
        });
        installer.install(&req).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls
            .iter()
            .all(|(_, cwd)| cwd.as_deref() == Some(Path::new("deps/ccls"))));
    }

    #[test]
    fn source_recipe_stops_at_first_failing_step() {
        let calls = RefCell::new(0);
        let run = |cmd: &str, _: Option<&Path>| -> Result<()> {
            *calls.borrow_mut() += 1;
            Err(CfgError::CommandFailed {
                command: cmd.to_string(),
                code: Some(1),
            })
        };
        let bind = |name: &str| -> Result<PathBuf> { Ok(PathBuf::from(name)) };
        let installer = RecipeInstaller::new(InstallerContext {
            run_command: &run,
            bind_repository: &bind,
        });

        let req = ToolRequirement::new("ccls").with_install(InstallRecipe::Source {
            repository: "ccls".to_string(),
            build: vec!["one".to_string(), "two".to_string()],
        });
        assert!(installer.install(&req).is_err());
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unreachable_repository_fails_before_build() {
        let run = |_: &str, _: Option<&Path>| -> Result<()> { panic!("must not build") };
        let installer = RecipeInstaller::new(InstallerContext {
            run_command: &run,
            bind_repository: &no_repository,
        });

        let req = ToolRequirement::new("ccls").with_install(InstallRecipe::Source {
            repository: "ccls".to_string(),
            build: vec!["make".to_string()],
        });
        let err = installer.install(&req).unwrap_err();
        assert!(err.to_string().contains("unknown repository 'ccls'"));
    }

    #[test]
    fn run_recipe_command_reports_exit_code() {
        assert!(run_recipe_command("true", None).is_ok());
        let err = run_recipe_command("exit 4", None).unwrap_err();
        assert!(matches!(err, CfgError::CommandFailed { code: Some(4), .. }));
    }
}
