//! Binary lookup on the search path.
//!
//! Resolution walks `PATH` entries directly instead of shelling out to
//! `which`, whose behavior varies between systems and shells.

use std::path::{Path, PathBuf};

/// Resolves a program name to an executable path.
pub trait BinaryLocator {
    /// Return the resolved executable, or `None` if absent.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Locator over an explicit list of directories.
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    entries: Vec<PathBuf>,
}

impl SearchPathLocator {
    /// Locator over the current process `PATH`.
    pub fn from_env() -> Self {
        Self {
            entries: parse_system_path(),
        }
    }

    /// Locator over the given directories, searched in order.
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    /// Directories searched, in order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}

impl BinaryLocator for SearchPathLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        let found = resolve_tool_path(program, &self.entries);
        tracing::debug!("locate {} -> {:?}", program, found);
        found
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that is a file and executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
