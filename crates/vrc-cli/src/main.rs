//! `vrc` entry point.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vrc_cli::cli::{Cli, Command};
use vrc_cli::{editor, ApiClient, CliConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Required before the command line is even looked at.
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let cli = Cli::parse();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Run { image_name } => start_dev_env(&config, &image_name).await,
    }
}

async fn start_dev_env(config: &CliConfig, image_name: &str) -> anyhow::Result<()> {
    println!("Trying to start dev env for: {image_name}");

    let client = ApiClient::new(config.endpoint.clone(), config.token.clone());
    let container = client.provision(image_name).await?;

    println!(
        "Container is running: {}",
        serde_json::to_string(&container)?
    );

    let uri = editor::folder_uri(&container.container_id)?;
    println!(
        "Invoking \"{}\"",
        editor::command_line(&config.editor, &uri)
    );

    // The container is up either way; a missing editor is not a failure.
    match editor::launch_detached(&config.editor, &container.docker_host, &uri) {
        Ok(launched) => tracing::debug!(pid = launched.pid, "Editor detached"),
        Err(e) => eprintln!("warning: {e}"),
    }

    Ok(())
}
