//! Version probes.
//!
//! A probe runs a located binary and reads its version from the output.
//! Two output families are supported:
//!
//! - field-delimited banners, where the version sits at a fixed token of the
//!   first line (`VIM - Vi IMproved 8.2 (2019 Dec 12, ...)`,
//!   `cmake version 3.16.3`)
//! - free-text banners carrying a `vMAJOR.MINOR` token somewhere (`v12.0.0`)
//!
//! Anything unexpected becomes a [`CfgError::VersionParseFailure`]; a probe
//! never panics on odd output.
//!
//! # Example
//!
//! ```
//! use cfgtool::requirements::probe::{parse_banner_version, parse_field_version};
//! use cfgtool::requirements::Version;
//!
//! let vim = "VIM - Vi IMproved 8.2 (2019 Dec 12, compiled Apr 02 2020)";
//! assert_eq!(parse_field_version(vim, 4).unwrap(), Version::new(8, 2));
//! assert_eq!(parse_banner_version("v12.0.0\n").unwrap(), Version::new(12, 0));
//! ```

use crate::error::{CfgError, Result};
use crate::requirements::registry::{ProbeStrategy, ToolRequirement};
use crate::requirements::version::Version;
use regex::Regex;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

static BANNER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9])v(\d+)\.(\d+)").expect("BANNER_REGEX must compile")
});

/// Reads a tool's version.
pub trait VersionProbe {
    /// Probe `resolved` for `requirement`'s version.
    ///
    /// Returns `Ok(None)` when the requirement's strategy does not read a
    /// version at all.
    fn probe(&self, requirement: &ToolRequirement, resolved: &Path) -> Result<Option<Version>>;
}

/// Probe that runs the binary as a subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProbe;

impl CommandProbe {
    /// Create a new command probe.
    pub fn new() -> Self {
        Self
    }

    fn run(&self, tool: &str, resolved: &Path, args: &[String]) -> Result<String> {
        let output = Command::new(resolved)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CfgError::VersionParseFailure {
                tool: tool.to_string(),
                message: format!("could not run {}: {}", resolved.display(), e),
            })?;

        tracing::debug!(
            "{} {} exited with {:?}",
            resolved.display(),
            args.join(" "),
            output.status.code()
        );

        // Some tools print their banner on stderr.
        let text = if output.stdout.iter().any(|b| !b.is_ascii_whitespace()) {
            output.stdout
        } else {
            output.stderr
        };

        String::from_utf8(text).map_err(|_| CfgError::VersionParseFailure {
            tool: tool.to_string(),
            message: "version output is not valid UTF-8".to_string(),
        })
    }
}

impl VersionProbe for CommandProbe {
    fn probe(&self, requirement: &ToolRequirement, resolved: &Path) -> Result<Option<Version>> {
        let tool = requirement.identifier.as_str();
        let parsed = match &requirement.probe {
            ProbeStrategy::Presence => return Ok(None),
            ProbeStrategy::Field { index, args } => {
                let output = self.run(tool, resolved, args)?;
                parse_field_version(&output, *index)
            }
            ProbeStrategy::Banner { args } => {
                let output = self.run(tool, resolved, args)?;
                parse_banner_version(&output)
            }
        };

        parsed
            .map(Some)
            .map_err(|message| CfgError::VersionParseFailure {
                tool: tool.to_string(),
                message,
            })
    }
}

/// Parse the whitespace-delimited token at `index` of the first line.
pub fn parse_field_version(output: &str, index: usize) -> std::result::Result<Version, String> {
    let first_line = output
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "no version output".to_string())?;

    let token = first_line.split_whitespace().nth(index).ok_or_else(|| {
        format!(
            "expected a version at field {} of '{}'",
            index,
            first_line.trim()
        )
    })?;

    token
        .parse::<Version>()
        .map_err(|e| format!("{} in '{}'", e, first_line.trim()))
}

/// Find the first `vMAJOR.MINOR` token in free-text output.
pub fn parse_banner_version(output: &str) -> std::result::Result<Version, String> {
    let caps = BANNER_REGEX
        .captures(output)
        .ok_or_else(|| "no vMAJOR.MINOR token in version output".to_string())?;

    let major = caps[1]
        .parse::<u32>()
        .map_err(|e| format!("bad major version: {}", e))?;
    let minor = caps[2]
        .parse::<u32>()
        .map_err(|e| format!("bad minor version: {}", e))?;

    Ok(Version::new(major, minor))
}
