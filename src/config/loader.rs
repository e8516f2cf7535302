//! Configuration file discovery and loading.
//!
//! Layers are merged in this order, later layers winning:
//! 1. Built-in defaults compiled into the binary
//! 2. User global config (`~/.config/cfgtool/config.yml`)
//! 3. Project config (`./cfgtool.yml`), or the file given with `--config`

use crate::config::merger::merge_configs;
use crate::config::schema::CfgConfig;
use crate::error::{CfgError, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// The built-in configuration.
pub const DEFAULT_CONFIG: &str = include_str!("default.yml");

/// Name of the project config file.
pub const PROJECT_CONFIG_FILE: &str = "cfgtool.yml";

/// Config files to merge over the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// `~/.config/cfgtool/config.yml`, if it exists.
    pub user_global: Option<PathBuf>,

    /// `./cfgtool.yml`, if it exists.
    pub project: Option<PathBuf>,

    /// File named on the command line. Replaces the project config and
    /// must exist.
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the current user.
    pub fn discover(working_dir: &Path, explicit: Option<&Path>) -> Self {
        let home = dirs::home_dir();
        Self::discover_with_home(home.as_deref(), working_dir, explicit)
    }

    /// Discover config files against an explicit home directory.
    pub fn discover_with_home(
        home: Option<&Path>,
        working_dir: &Path,
        explicit: Option<&Path>,
    ) -> Self {
        let user_global = home
            .map(|h| h.join(".config").join("cfgtool").join("config.yml"))
            .filter(|p| p.is_file());
        let project = match explicit {
            Some(_) => None,
            None => Some(working_dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        Self {
            user_global,
            project,
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// Files to load, in merge order.
    pub fn layers(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.explicit]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Load a config file as a raw YAML value.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CfgError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CfgError::Io(e)
        }
    })?;

    parse_value(&content, path)
}

fn parse_value(content: &str, path: &Path) -> Result<Value> {
    serde_yaml::from_str(content).map_err(|e| CfgError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// The built-in defaults as a YAML value.
pub fn default_config_value() -> Result<Value> {
    parse_value(DEFAULT_CONFIG, Path::new("<built-in defaults>"))
}

/// Load the defaults and every discovered layer into one config.
///
/// Empty files are ignored.
pub fn load_merged_config(paths: &ConfigPaths) -> Result<CfgConfig> {
    let mut layers = vec![default_config_value()?];
    let mut last = PathBuf::from("<built-in defaults>");

    for path in paths.layers() {
        tracing::debug!("Loading config layer {}", path.display());
        let value = load_config_value(path)?;
        if !value.is_null() {
            layers.push(value);
        }
        last = path.clone();
    }

    serde_yaml::from_value(merge_configs(&layers)).map_err(|e| CfgError::ConfigParseError {
        path: last,
        message: e.to_string(),
    })
}
