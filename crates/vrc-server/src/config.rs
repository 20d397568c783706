//! Configuration for the provisioner server.
//!
//! Configuration is loaded from environment variables. Only the server token
//! is required.

use crate::host::DEFAULT_IP_DISCOVERY_URL;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default user in the advertised `ssh://` docker host.
pub const DEFAULT_SSH_USER: &str = "ubuntu";

/// Configuration for the VRC server.
#[derive(Clone)]
pub struct ServerConfig {
    /// The single bearer token callers must present.
    pub token: String,

    /// HTTP server bind address.
    pub http_addr: SocketAddr,

    /// Fixed public host; skips address discovery when set.
    pub public_host: Option<String>,

    /// User placed in the advertised docker host.
    pub ssh_user: String,

    /// Endpoint answering `{"ip": "..."}`.
    pub ip_discovery_url: String,

    /// Container engine CLI.
    pub docker_binary: PathBuf,
}

/// Configuration error. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Please set VRC_SERVER_TOKEN")]
    MissingToken,

    #[error("invalid PORT: {0}")]
    InvalidPort(String),

    #[error("invalid VRC_BIND_HOST: {0}")]
    InvalidBindHost(String),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `VRC_SERVER_TOKEN` | required |
    /// | `PORT` | `3000` |
    /// | `VRC_BIND_HOST` | `0.0.0.0` |
    /// | `VRC_PUBLIC_HOST` | discovered |
    /// | `VRC_SSH_USER` | `ubuntu` |
    /// | `VRC_IP_DISCOVERY_URL` | `https://api.ipify.org?format=json` |
    /// | `VRC_DOCKER_BIN` | `docker` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = var("VRC_SERVER_TOKEN").ok_or(ConfigError::MissingToken)?;

        let port = match var("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(v))?,
            None => DEFAULT_PORT,
        };

        let bind_host = match var("VRC_BIND_HOST") {
            Some(v) => v
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBindHost(v))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        Ok(Self {
            token,
            http_addr: SocketAddr::new(bind_host, port),
            public_host: var("VRC_PUBLIC_HOST"),
            ssh_user: var("VRC_SSH_USER").unwrap_or_else(|| DEFAULT_SSH_USER.to_string()),
            ip_discovery_url: var("VRC_IP_DISCOVERY_URL")
                .unwrap_or_else(|| DEFAULT_IP_DISCOVERY_URL.to_string()),
            docker_binary: var("VRC_DOCKER_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("docker")),
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("token", &"<redacted>")
            .field("http_addr", &self.http_addr)
            .field("public_host", &self.public_host)
            .field("ssh_user", &self.ssh_user)
            .field("ip_discovery_url", &self.ip_discovery_url)
            .field("docker_binary", &self.docker_binary)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("VRC_SERVER_TOKEN", "s3cret")]).unwrap();
        assert_eq!(config.token, "s3cret");
        assert_eq!(config.http_addr.port(), 3000);
        assert!(config.http_addr.ip().is_unspecified());
        assert_eq!(config.public_host, None);
        assert_eq!(config.ssh_user, "ubuntu");
        assert_eq!(config.ip_discovery_url, DEFAULT_IP_DISCOVERY_URL);
        assert_eq!(config.docker_binary, PathBuf::from("docker"));
    }

    #[test]
    fn test_token_required() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingToken)));
        assert!(matches!(
            load(&[("VRC_SERVER_TOKEN", "  ")]),
            Err(ConfigError::MissingToken)
        ));
        assert_eq!(
            ConfigError::MissingToken.to_string(),
            "Please set VRC_SERVER_TOKEN"
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VRC_SERVER_TOKEN", "t"),
            ("PORT", "8080"),
            ("VRC_BIND_HOST", "127.0.0.1"),
            ("VRC_PUBLIC_HOST", "localhost"),
            ("VRC_SSH_USER", "dev"),
            ("VRC_DOCKER_BIN", "podman"),
        ])
        .unwrap();

        assert_eq!(config.http_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.public_host.as_deref(), Some("localhost"));
        assert_eq!(config.ssh_user, "dev");
        assert_eq!(config.docker_binary, PathBuf::from("podman"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("VRC_SERVER_TOKEN", "t"), ("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            load(&[("VRC_SERVER_TOKEN", "t"), ("VRC_BIND_HOST", "nowhere")]),
            Err(ConfigError::InvalidBindHost(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[("VRC_SERVER_TOKEN", "s3cret")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
