//! The configured-command tool.

pub mod config;
mod execute;

pub use config::{CommandSpec, CommandsConfig, ConfigError, DEFAULT_TIMEOUT};
pub use execute::ExecuteCommand;

use runtime::{Registry, RegistryError};
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_COMMANDS_FILE: &str = ".agent-commands.toml";

pub fn register(registry: &Registry, workdir: &Path, commands_path: &Path) -> Result<(), RegistryError> {
    registry.register_tool(ExecuteCommand::new(workdir, commands_path))
}
