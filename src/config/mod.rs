//! Configuration loading, parsing, and validation.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use cfgtool::config::{load_merged_config, validate, ConfigPaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("cfgtool.yml"), "tools:\n  node: \"12.0\"\n").unwrap();
//!
//! let paths = ConfigPaths::discover_with_home(None, temp.path(), None);
//! let config = load_merged_config(&paths).unwrap();
//! validate(&config).unwrap();
//! assert!(config.tools.contains_key("vim"));
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    default_config_value, load_config_value, load_merged_config, ConfigPaths, DEFAULT_CONFIG,
    PROJECT_CONFIG_FILE,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{CfgConfig, OrderedMap, RepositoryConfig, ToolConfig};
pub use validator::{validate, validate_config, ValidationError};

/// Load, merge and validate the configuration for `working_dir`.
pub fn load_config(
    working_dir: &std::path::Path,
    explicit: Option<&std::path::Path>,
) -> crate::error::Result<CfgConfig> {
    let paths = ConfigPaths::discover(working_dir, explicit);
    let config = load_merged_config(&paths)?;
    validate(&config)?;
    Ok(config)
}
