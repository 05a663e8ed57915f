//! Command definitions loaded from `.agent-commands.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Used when a command sets no timeout, or zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Top-level command configuration.
///
/// ```toml
/// [commands.test]
/// command = "cargo test"
/// description = "Run the test suite"
/// timeout_seconds = 300
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CommandsConfig {
    #[serde(default)]
    pub commands: BTreeMap<String, CommandSpec>,
}

/// One runnable command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSpec {
    /// Program and arguments, split on whitespace. No shell is involved.
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeout_seconds: u64,
}

impl CommandSpec {
    pub fn timeout(&self) -> Duration {
        match self.timeout_seconds {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    /// Program and arguments, or `None` if the command line is blank.
    pub fn argv(&self) -> Option<(&str, Vec<&str>)> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl CommandsConfig {
    /// Load from `path`. A missing file is an empty configuration.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(toml: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml)
    }

    /// Configured names, ordered.
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_defaults_timeout() {
        let config = CommandsConfig::parse(
            r#"
            [commands.lint]
            command = "cargo clippy --all-targets"
            description = "Lint"

            [commands.test]
            command = "cargo test"
            timeout_seconds = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.names(), vec!["lint", "test"]);
        let lint = &config.commands["lint"];
        assert_eq!(lint.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(lint.argv(), Some(("cargo", vec!["clippy", "--all-targets"])));
        assert_eq!(config.commands["test"].timeout(), Duration::from_secs(300));
        assert_eq!(config.commands["test"].description, "");
    }

    #[test]
    fn blank_command_has_no_argv() {
        let spec = CommandSpec {
            command: "   ".into(),
            description: String::new(),
            timeout_seconds: 0,
        };
        assert_eq!(spec.argv(), None);
    }

    #[test]
    fn missing_command_field_is_a_parse_error() {
        assert!(CommandsConfig::parse("[commands.x]\ndescription = \"no command\"").is_err());
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CommandsConfig::load(&dir.path().join("absent.toml")).await.unwrap();
        assert!(config.commands.is_empty());
    }

    #[tokio::test]
    async fn unparsable_file_names_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "commands = 3").unwrap();
        let err = CommandsConfig::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
