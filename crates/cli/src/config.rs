//! Configuration loading from billdozer.toml.

use runtime::AnthropicAuth;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Model to use.
    pub model: String,

    pub max_tokens: u32,

    /// Anthropic API key (sk-ant-api01-...). Falls back to `ANTHROPIC_API_KEY`.
    /// Mutually exclusive with auth_token.
    pub api_key: Option<String>,

    /// Bearer token for a gateway in front of the API.
    /// Mutually exclusive with api_key.
    pub auth_token: Option<String>,

    /// API origin, e.g. a proxy. Defaults to https://api.anthropic.com.
    pub base_url: Option<String>,

    /// System prompt sent with every request.
    pub system: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            api_key: None,
            auth_token: None,
            base_url: None,
            system: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build the authentication from config, using `env_key` (the value of
    /// `ANTHROPIC_API_KEY`) when nothing is configured.
    pub fn auth(&self, env_key: Option<String>) -> Result<AnthropicAuth, ConfigError> {
        match (&self.backend.api_key, &self.backend.auth_token) {
            (Some(key), None) => Ok(AnthropicAuth::ApiKey(key.clone())),
            (None, Some(token)) => Ok(AnthropicAuth::Bearer(token.clone())),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousAuth),
            (None, None) => env_key
                .filter(|key| !key.is_empty())
                .map(AnthropicAuth::ApiKey)
                .ok_or(ConfigError::MissingAuth),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error(
        "authentication not configured: set ANTHROPIC_API_KEY, backend.api_key or backend.auth_token"
    )]
    MissingAuth,

    #[error("ambiguous authentication: set either backend.api_key OR backend.auth_token, not both")]
    AmbiguousAuth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, "claude-sonnet-4-20250514");
        assert_eq!(config.backend.max_tokens, 4096);
        assert!(config.backend.system.is_none());
    }

    #[test]
    fn partial_backend_keeps_other_defaults() {
        let config = Config::parse(
            r#"
            [backend]
            model = "claude-opus-4-20250514"
            system = "Be brief."
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.model, "claude-opus-4-20250514");
        assert_eq!(config.backend.max_tokens, 4096);
        assert_eq!(config.backend.system.as_deref(), Some("Be brief."));
    }

    #[test]
    fn auth_prefers_config_then_environment() {
        let mut config = Config::default();
        assert!(matches!(config.auth(None), Err(ConfigError::MissingAuth)));
        assert!(matches!(
            config.auth(Some(String::new())),
            Err(ConfigError::MissingAuth)
        ));
        assert!(matches!(
            config.auth(Some("env".into())),
            Ok(AnthropicAuth::ApiKey(key)) if key == "env"
        ));

        config.backend.api_key = Some("file".into());
        assert!(matches!(
            config.auth(Some("env".into())),
            Ok(AnthropicAuth::ApiKey(key)) if key == "file"
        ));

        config.backend.auth_token = Some("token".into());
        assert!(matches!(config.auth(None), Err(ConfigError::AmbiguousAuth)));

        config.backend.api_key = None;
        assert!(matches!(config.auth(None), Ok(AnthropicAuth::Bearer(_))));
    }

    #[test]
    fn missing_default_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(Config::load_or_default(dir.path().join("billdozer.toml")).is_ok());
        assert!(matches!(
            Config::load(dir.path().join("billdozer.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            Config::parse("[backend]\nmax_tokens = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
