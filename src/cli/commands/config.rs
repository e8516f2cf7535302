//! Config command implementation.
//!
//! The `cfgtool config` command prints the merged configuration.

use crate::cli::args::ConfigArgs;
use crate::config::ConfigPaths;
use crate::error::{CfgError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    context: CommandContext,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(context: CommandContext, args: ConfigArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;

        let output = if self.args.json {
            serde_json::to_string_pretty(&config).map_err(|e| CfgError::Other(e.into()))?
        } else {
            let paths = ConfigPaths::discover(
                &self.context.working_dir,
                self.context.config_path.as_deref(),
            );
            let mut header = String::from("# built-in defaults\n");
            for path in paths.layers() {
                header.push_str(&format!("# {}\n", path.display()));
            }
            let yaml = serde_yaml::to_string(&config).map_err(|e| CfgError::Other(e.into()))?;
            header + &yaml
        };
        ui.message(output.trim_end());

        Ok(CommandResult::success())
    }
}
