//! VRC provisioner server entry point.
//!
//! Loads configuration from the environment, resolves the docker host to
//! advertise, and serves the provisioning API until Ctrl-C.

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vrc_core::{DockerCli, Provisioner};
use vrc_server::{host, http, AllowedTokens, AppState, ServerConfig};

/// `base` plus info-level logging for the provisioner and request traces.
fn log_filter(base: EnvFilter) -> anyhow::Result<EnvFilter> {
    Ok(base
        .add_directive("vrc_server=info".parse()?)
        .add_directive("vrc_core=info".parse()?)
        .add_directive("tower_http=info".parse()?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter(EnvFilter::from_default_env())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "Configuration loaded");

    let docker_host = host::resolve_docker_host(&config).await?;

    let engine = Arc::new(DockerCli::with_binary(&config.docker_binary));
    let state = AppState::new(Provisioner::new(engine), docker_host.as_str());
    let tokens = Arc::new(AllowedTokens::new([config.token.clone()]));
    let router = http::build_router(state, tokens);

    tracing::info!(
        addr = %config.http_addr,
        docker_host = %docker_host,
        "VRC provisioner server ready"
    );

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Received shutdown signal");
    };

    http::serve(router, config.http_addr, shutdown).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_enables_provisioner_logs() {
        let filter = log_filter(EnvFilter::new("")).unwrap().to_string();
        for target in ["vrc_server=info", "vrc_core=info", "tower_http=info"] {
            assert!(filter.contains(target), "{filter}");
        }
    }
}
