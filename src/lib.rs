//! cfgtool - Editor and toolchain environment bootstrapper.
//!
//! cfgtool checks that the tools an editor setup depends on are installed
//! and recent enough, installs the ones that are not in prerequisite order,
//! clones the repositories that supply configuration and source trees, and
//! links configuration into the home directory.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`error`] - Error types and result aliases
//! - [`links`] - Symlinks from cloned configuration into the home directory
//! - [`repository`] - Binding to or cloning git repositories
//! - [`requirements`] - Tool requirements, probing, planning and installers
//! - [`runner`] - Dependency graph, plan execution and the bootstrap run
//! - [`shell`] - Shell command execution
//! - [`ui`] - Spinners, status lines and terminal output
//!
//! # Example
//!
//! ```
//! use cfgtool::requirements::probe::parse_field_version;
//! use cfgtool::requirements::Version;
//!
//! let found = parse_field_version("VIM - Vi IMproved 8.2 (2019 Dec 12)", 4).unwrap();
//! assert!(found >= Version::new(8, 1));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod links;
pub mod repository;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{CfgError, Result};
