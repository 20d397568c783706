//! Client configuration from the environment.

use crate::editor::DEFAULT_EDITOR;
use std::fmt;
use url::Url;

/// Settings every command needs.
#[derive(Clone)]
pub struct CliConfig {
    /// Base URL of the provisioner API.
    pub endpoint: Url,
    /// Bearer token sent with every request.
    pub token: String,
    /// Editor binary launched on success.
    pub editor: String,
}

/// Configuration error. Fatal before any command runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Please set VRC_API_ENDPOINT.")]
    MissingEndpoint,

    #[error("Please set VRC_API_TOKEN.")]
    MissingToken,

    #[error("VRC_API_ENDPOINT is not a valid URL: {0}")]
    InvalidEndpoint(String),
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `VRC_API_ENDPOINT` | required |
    /// | `VRC_API_TOKEN` | required |
    /// | `VRC_EDITOR` | `code` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = var("VRC_API_ENDPOINT").ok_or(ConfigError::MissingEndpoint)?;
        let token = var("VRC_API_TOKEN").ok_or(ConfigError::MissingToken)?;

        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        Ok(Self {
            endpoint,
            token,
            editor: var("VRC_EDITOR").unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
        })
    }
}

impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("editor", &self.editor)
            .finish()
    }
}
