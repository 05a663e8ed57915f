//! Tools the agent offers to the model.
//!
//! Two families, each registered explicitly into a [`Registry`]:
//!
//! - [`file`]: list, read, write, create, edit, delete and glob search,
//!   resolved against a working directory.
//! - [`command`]: run commands declared in a project TOML file.

pub mod command;
pub mod file;

use runtime::{Registry, RegistryError};
use std::path::PathBuf;

/// Where the tools operate.
#[derive(Debug, Clone)]
pub struct ToolboxConfig {
    /// Relative tool paths resolve against this directory; commands run in it.
    pub workdir: PathBuf,
    /// The command definitions file, read on every `execute_command` call.
    pub commands_path: PathBuf,
}

impl ToolboxConfig {
    /// Tools rooted at `workdir`, with commands read from
    /// `workdir/.agent-commands.toml`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        Self {
            commands_path: workdir.join(command::DEFAULT_COMMANDS_FILE),
            workdir,
        }
    }
}

/// Register every tool in this crate.
pub fn register_all(registry: &Registry, config: &ToolboxConfig) -> Result<(), RegistryError> {
    file::register(registry, &config.workdir)?;
    command::register(registry, &config.workdir, &config.commands_path)?;
    tracing::info!(tools = registry.len(), workdir = %config.workdir.display(), "toolbox registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_tool_once() {
        let registry = Registry::new();
        register_all(&registry, &ToolboxConfig::new(".")).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "create_file",
                "delete_file",
                "edit_file",
                "execute_command",
                "glob_search",
                "list_files",
                "read_file",
                "write_file",
            ]
        );

        // A second pass collides with the first.
        assert!(matches!(
            register_all(&registry, &ToolboxConfig::new(".")),
            Err(RegistryError::Duplicate { .. })
        ));
    }

    #[test]
    fn advertised_schemas_are_closed_objects() {
        let registry = Registry::new();
        register_all(&registry, &ToolboxConfig::new(".")).unwrap();
        for spec in registry.specs() {
            assert_eq!(spec.input_schema["type"], "object", "{}", spec.name);
            assert_eq!(spec.input_schema["additionalProperties"], false, "{}", spec.name);
            assert!(!spec.description.is_empty(), "{}", spec.name);
        }

        let edit = registry.lookup("edit_file").unwrap();
        assert_eq!(
            edit.input_schema["required"],
            serde_json::json!(["path", "old_str", "new_str"])
        );
    }
}
