//! Resolution of the docker host advertised to clients.
//!
//! The server tells callers to reach its container engine over SSH at its
//! own public address. That address is either configured or discovered once
//! at startup.

use crate::config::ServerConfig;
use serde::Deserialize;
use std::time::Duration;

/// Default address discovery endpoint.
pub const DEFAULT_IP_DISCOVERY_URL: &str = "https://api.ipify.org?format=json";

/// Timeout for the discovery request.
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors while resolving the public host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to query {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to GET {url} - {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("discovery response from {0} has no ip")]
    EmptyAddress(String),
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Format the connection string editors use to reach the engine.
pub fn docker_host(user: &str, host: &str) -> String {
    format!("ssh://{user}@{host}")
}

/// Ask `url` for this machine's public address.
pub async fn discover_public_ip(url: &str) -> Result<String, HostError> {
    let request_error = |source| HostError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(DISCOVERY_TIMEOUT)
        .build()
        .map_err(request_error)?;

    tracing::debug!(%url, "Discovering public address");
    let response = client.get(url).send().await.map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(HostError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body: IpResponse = response.json().await.map_err(request_error)?;
    let ip = body.ip.trim().to_string();
    if ip.is_empty() {
        return Err(HostError::EmptyAddress(url.to_string()));
    }

    tracing::info!(%ip, "Discovered public address");
    Ok(ip)
}

/// The docker host for `config`: the fixed public host if configured,
/// otherwise the discovered public address.
pub async fn resolve_docker_host(config: &ServerConfig) -> Result<String, HostError> {
    let host = match &config.public_host {
        Some(host) => {
            tracing::info!(%host, "Using configured public host");
            host.clone()
        }
        None => discover_public_ip(&config.ip_discovery_url).await?,
    };
    Ok(docker_host(&config.ssh_user, &host))
}
