//! [`ContainerEngine`] backed by the `docker` command line.
//!
//! Listing is done in two steps: ask for full ids, then `inspect` them to get
//! the same `Id`/`RepoTags`/`Image` fields the engine API reports.

use crate::engine::{ContainerEngine, ContainerSpec, ContainerSummary, ImageSummary};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

/// Default engine binary.
const DEFAULT_BINARY: &str = "docker";

/// Container engine that shells out to `docker` (or a compatible CLI).
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl DockerCli {
    /// Use `docker` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    /// Use a specific engine binary, e.g. `podman` or an absolute path.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run the engine with `args` and return its stdout.
    async fn run(&self, args: &[String]) -> Result<String> {
        let command_line = format!("{} {}", self.binary.display(), args.join(" "));
        debug!(command = %command_line, "Running engine command");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(command = %command_line, status = %output.status, stderr = %stderr, "Engine command failed");
            return Err(CoreError::CommandFailed {
                command: command_line,
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(stdout = %stdout, "Engine command output");
        Ok(stdout)
    }

    /// List ids with `<object> ls`, then inspect them all at once.
    async fn inspect_all(&self, object: &str, ls_flags: &[&str]) -> Result<String> {
        let mut ls = vec![object.to_string(), "ls".to_string()];
        ls.extend(ls_flags.iter().map(|f| f.to_string()));
        ls.extend(["-q".to_string(), "--no-trunc".to_string()]);

        let ids = parse_ids(&self.run(&ls).await?);
        if ids.is_empty() {
            return Ok("[]".to_string());
        }

        let mut inspect = vec![object.to_string(), "inspect".to_string()];
        inspect.extend(ids);
        self.run(&inspect).await
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerEngine for DockerCli {
    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        let json = self.inspect_all("image", &[]).await?;
        let images: Vec<ImageSummary> = serde_json::from_str(&json)?;
        debug!(count = images.len(), "Listed images");
        Ok(images)
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let json = self.inspect_all("container", &["-a"]).await?;
        let containers: Vec<ContainerSummary> = serde_json::from_str(&json)?;
        debug!(count = containers.len(), "Listed containers");
        Ok(containers)
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        let stdout = self.run(&build_create_args(spec)).await?;
        let id = stdout.lines().last().unwrap_or_default().trim().to_string();
        if id.is_empty() {
            return Err(CoreError::Malformed(
                "container create returned no id".into(),
            ));
        }
        debug!(container_id = %id, image = %spec.image, "Created container");
        Ok(id)
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.run(&["container".to_string(), "start".to_string(), id.to_string()])
            .await?;
        debug!(container_id = %id, "Started container");
        Ok(())
    }
}

/// Arguments for `docker container create` from a spec.
fn build_create_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec!["container".to_string(), "create".to_string()];

    if spec.tty {
        args.push("--tty".to_string());
    }
    if spec.open_stdin {
        args.push("--interactive".to_string());
    }
    for (attach, stream) in [
        (spec.attach_stdin, "stdin"),
        (spec.attach_stdout, "stdout"),
        (spec.attach_stderr, "stderr"),
    ] {
        if attach {
            args.push("--attach".to_string());
            args.push(stream.to_string());
        }
    }

    args.push(spec.image.clone());
    args.extend(spec.cmd.iter().cloned());
    args
}

/// One id per non-empty line, duplicates dropped (an image id repeats once
/// per tag), order preserved.
fn parse_ids(stdout: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
