//! Binding to local clones and cloning remotes.
//!
//! The gateway first tries to open `local_root/name` as an existing work
//! tree. Only when that fails does it clone, so re-running against a
//! populated deps root touches no network.
//!
//! Clones land in `local_root/.name.partial` and are renamed into place once
//! complete. Anything already at `local_root/name` that does not open as a
//! repository is moved to `local_root/.name.displaced`, so an interrupted
//! run never blocks the next one.

use crate::error::{CfgError, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A repository the environment depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySpec {
    /// Repository name, also its directory under `local_root`.
    pub name: String,
    /// Remote URL to clone from.
    pub remote_url: String,
    /// Branch to check out when cloning.
    pub branch: String,
    /// Directory holding local clones.
    pub local_root: PathBuf,
}

impl RepositorySpec {
    /// Where the clone lives.
    pub fn local_path(&self) -> PathBuf {
        self.local_root.join(&self.name)
    }
}

/// How a repository became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryOrigin {
    /// An existing local clone was opened.
    Bound,
    /// The remote was cloned fresh.
    Cloned,
}

/// A usable local repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryHandle {
    /// Repository name.
    pub name: String,
    /// Path of the work tree.
    pub path: PathBuf,
    /// Commit checked out, when the repository has one.
    pub head: Option<String>,
    /// Whether the repository was bound or cloned.
    pub origin: RepositoryOrigin,
}

/// Makes repositories available locally.
pub trait RepositoryGateway {
    /// Open the local clone of `spec`, cloning it first if needed.
    fn bind_or_clone(&self, spec: &RepositorySpec) -> Result<RepositoryHandle>;
}

/// Low-level git operations.
pub trait GitClient {
    /// Open `path` as the top of a work tree, returning its HEAD if any.
    fn open(&self, path: &Path) -> anyhow::Result<Option<String>>;

    /// Clone `remote` at `branch` into `path`.
    fn clone_repo(&self, remote: &str, branch: &str, path: &Path) -> anyhow::Result<()>;
}

/// [`GitClient`] backed by the `git` command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    fn run(args: &[&str], cwd: Option<&Path>) -> anyhow::Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().context("could not run git")?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitClient for GitCli {
    fn open(&self, path: &Path) -> anyhow::Result<Option<String>> {
        if !path.is_dir() {
            bail!("{} does not exist", path.display());
        }

        // A deps root inside another checkout would otherwise resolve to
        // the enclosing repository.
        let toplevel = Self::run(&["rev-parse", "--show-toplevel"], Some(path))?;
        let expected = path.canonicalize()?;
        let actual = Path::new(&toplevel).canonicalize()?;
        if actual != expected {
            bail!(
                "{} is inside {}, not a repository of its own",
                path.display(),
                actual.display()
            );
        }

        Ok(Self::run(&["rev-parse", "HEAD"], Some(path)).ok())
    }

    fn clone_repo(&self, remote: &str, branch: &str, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::run(
            &[
                "clone",
                "--branch",
                branch,
                remote,
                &path.to_string_lossy(),
            ],
            None,
        )?;
        Ok(())
    }
}

/// [`RepositoryGateway`] over a [`GitClient`].
#[derive(Debug, Clone, Default)]
pub struct GitGateway<C = GitCli> {
    client: C,
}

impl GitGateway<GitCli> {
    /// Gateway using the `git` command line.
    pub fn new() -> Self {
        Self { client: GitCli }
    }
}

impl<C: GitClient> GitGateway<C> {
    /// Gateway over a custom client.
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: GitClient> RepositoryGateway for GitGateway<C> {
    fn bind_or_clone(&self, spec: &RepositorySpec) -> Result<RepositoryHandle> {
        let path = spec.local_path();

        std::fs::create_dir_all(&spec.local_root).map_err(|e| {
            CfgError::RepositoryBindFailure {
                name: spec.name.clone(),
                path: spec.local_root.clone(),
                message: format!("could not create deps root: {}", e),
            }
        })?;

        tracing::info!("Binding to {} at {}", spec.name, path.display());
        let bind_error = match self.client.open(&path) {
            Ok(head) => {
                tracing::debug!("bound {} at {:?}", spec.name, head);
                return Ok(RepositoryHandle {
                    name: spec.name.clone(),
                    path,
                    head,
                    origin: RepositoryOrigin::Bound,
                });
            }
            Err(e) => e,
        };

        tracing::info!(
            "Could not bind {} ({:#}); cloning {} on {}",
            spec.name,
            bind_error,
            spec.remote_url,
            spec.branch
        );

        let staging = spec.local_root.join(format!(".{}.partial", spec.name));
        remove_path(&staging).map_err(|e| bind_failure(spec, &staging, e))?;

        self.client
            .clone_repo(&spec.remote_url, &spec.branch, &staging)
            .map_err(|clone_error| {
                tracing::warn!("clone of {} failed: {:#}", spec.name, clone_error);
                CfgError::RepositoryCloneFailure {
                    name: spec.name.clone(),
                    remote: spec.remote_url.clone(),
                    message: format!("{:#} (bind failed: {:#})", clone_error, bind_error),
                }
            })?;

        if path.symlink_metadata().is_ok() {
            let displaced = spec.local_root.join(format!(".{}.displaced", spec.name));
            tracing::warn!(
                "{} is not a usable clone; moving it to {}",
                path.display(),
                displaced.display()
            );
            remove_path(&displaced).map_err(|e| bind_failure(spec, &displaced, e))?;
            std::fs::rename(&path, &displaced).map_err(|e| bind_failure(spec, &path, e))?;
        }
        std::fs::rename(&staging, &path).map_err(|e| bind_failure(spec, &path, e))?;

        let head = self.client.open(&path).ok().flatten();
        Ok(RepositoryHandle {
            name: spec.name.clone(),
            path,
            head,
            origin: RepositoryOrigin::Cloned,
        })
    }
}

fn bind_failure(spec: &RepositorySpec, path: &Path, e: std::io::Error) -> CfgError {
    CfgError::RepositoryBindFailure {
        name: spec.name.clone(),
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Remove a file, symlink or directory tree; absent paths are fine.
fn remove_path(path: &Path) -> std::io::Result<()> {
    match path.symlink_metadata() {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
