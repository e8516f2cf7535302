//! Symlinks from cloned configuration into the home directory.
//!
//! Links are idempotent: a destination that already points at the right
//! source is left alone. Existing files and symlinks are only replaced when
//! overwriting is requested, and real directories never are.

use crate::error::{CfgError, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// A configured link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Repository holding the source.
    pub repository: String,
    /// Path of the source inside the repository.
    pub source: PathBuf,
    /// Destination; a leading `~` is the home directory.
    pub target: String,
}

/// What [`make_symlink`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Created,
    AlreadyLinked,
    Replaced,
}

/// Final state of a configured link in a run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Created,
    AlreadyLinked,
    Replaced,
    /// Destination exists and was left untouched.
    Conflict,
    /// Not attempted (dry run, `--skip-links`, or an earlier stage failed).
    Skipped,
    Failed,
}

impl From<LinkOutcome> for LinkState {
    fn from(outcome: LinkOutcome) -> Self {
        match outcome {
            LinkOutcome::Created => LinkState::Created,
            LinkOutcome::AlreadyLinked => LinkState::AlreadyLinked,
            LinkOutcome::Replaced => LinkState::Replaced,
        }
    }
}

/// One line of the link report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub state: LinkState,
    pub message: String,
}

impl LinkReport {
    /// Whether this link makes the run fail.
    pub fn is_failure(&self) -> bool {
        self.state == LinkState::Failed
    }
}

/// Expand a leading `~` against `home`.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Point `dst` at `src`.
///
/// Returns [`CfgError::SymlinkConflict`] when `dst` exists, does not already
/// point at `src`, and either `overwrite` is off or `dst` is a real
/// directory.
pub fn make_symlink(src: &Path, dst: &Path, overwrite: bool) -> Result<LinkOutcome> {
    let existing = match dst.symlink_metadata() {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let outcome = match existing {
        None => LinkOutcome::Created,
        Some(meta) if meta.file_type().is_symlink() => {
            if std::fs::read_link(dst)? == src {
                tracing::debug!("{} already links to {}", dst.display(), src.display());
                return Ok(LinkOutcome::AlreadyLinked);
            }
            if !overwrite {
                return Err(CfgError::SymlinkConflict {
                    target: dst.to_path_buf(),
                });
            }
            std::fs::remove_file(dst)?;
            LinkOutcome::Replaced
        }
        Some(meta) if meta.is_dir() || !overwrite => {
            return Err(CfgError::SymlinkConflict {
                target: dst.to_path_buf(),
            });
        }
        Some(_) => {
            std::fs::remove_file(dst)?;
            LinkOutcome::Replaced
        }
    };

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    symlink(src, dst)?;
    tracing::info!("Linked {} -> {}", dst.display(), src.display());
    Ok(outcome)
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(not(unix))]
fn symlink(_src: &Path, _dst: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only supported on Unix",
    ))
}

/// Applies configured links.
#[derive(Debug, Clone)]
pub struct LinkManager {
    home: PathBuf,
    overwrite: bool,
}

impl LinkManager {
    pub fn new(home: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            home: home.into(),
            overwrite,
        }
    }

    /// Manager for the current user's home directory.
    pub fn for_current_user(overwrite: bool) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| CfgError::ConfigValidationError {
            message: "could not determine the home directory".to_string(),
        })?;
        Ok(Self::new(home, overwrite))
    }

    /// Resolved source and destination of `link` given its repository path.
    pub fn resolve(&self, link: &LinkSpec, repository_path: &Path) -> (PathBuf, PathBuf) {
        let source = repository_path.join(&link.source);
        let source = std::path::absolute(&source).unwrap_or(source);
        (source, expand_home(&link.target, &self.home))
    }

    /// Apply one link.
    pub fn apply(&self, link: &LinkSpec, repository_path: &Path) -> LinkReport {
        let (source, target) = self.resolve(link, repository_path);

        if !source.exists() {
            return LinkReport {
                message: format!(
                    "{} does not exist in repository '{}'",
                    link.source.display(),
                    link.repository
                ),
                source,
                target,
                state: LinkState::Failed,
            };
        }

        match make_symlink(&source, &target, self.overwrite) {
            Ok(outcome) => LinkReport {
                message: match outcome {
                    LinkOutcome::AlreadyLinked => format!("{} already linked", target.display()),
                    _ => format!("{} -> {}", target.display(), source.display()),
                },
                source,
                target,
                state: outcome.into(),
            },
            Err(e @ CfgError::SymlinkConflict { .. }) => {
                tracing::warn!("{}", e);
                LinkReport {
                    message: format!("{} (use --overwrite-links to replace it)", e),
                    source,
                    target,
                    state: LinkState::Conflict,
                }
            }
            Err(e) => LinkReport {
                message: format!("Could not link {}: {}", target.display(), e),
                source,
                target,
                state: LinkState::Failed,
            },
        }
    }

    /// Report a link without touching the filesystem.
    pub fn skip(&self, link: &LinkSpec, repository_path: &Path, reason: &str) -> LinkReport {
        let (source, target) = self.resolve(link, repository_path);
        LinkReport {
            message: format!("{} -> {} ({})", target.display(), source.display(), reason),
            source,
            target,
            state: LinkState::Skipped,
        }
    }
}
