//! The container engine seam.
//!
//! The provisioner only needs four request/response operations from a
//! container engine. Everything engine-specific lives behind
//! [`ContainerEngine`].

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An image as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Engine-assigned image id (e.g. `sha256:...`).
    #[serde(rename = "Id")]
    pub id: String,
    /// `repository:tag` references; may be empty for dangling images.
    #[serde(rename = "RepoTags", default, deserialize_with = "null_as_empty")]
    pub repo_tags: Vec<String>,
}

impl ImageSummary {
    /// Check whether any tag's repository part equals `name`, ignoring case.
    ///
    /// The repository part is everything before the first `:`.
    pub fn matches_name(&self, name: &str) -> bool {
        self.repo_tags.iter().any(|tag| {
            let repo = tag.split(':').next().unwrap_or_default();
            repo.eq_ignore_ascii_case(name)
        })
    }

    /// The primary `repository:tag`, used when creating containers.
    pub fn primary_tag(&self) -> Option<&str> {
        self.repo_tags.first().map(String::as_str)
    }
}

/// A container as reported by the engine, in any state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Engine-assigned container id.
    #[serde(rename = "Id")]
    pub id: String,
    /// Id of the image the container was created from.
    #[serde(rename = "Image")]
    pub image_id: String,
}

/// What to create.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerSpec {
    /// Image reference (`repository:tag` or id).
    pub image: String,
    /// Command to run instead of the image default.
    pub cmd: Vec<String>,
    /// Allocate a pseudo-terminal.
    pub tty: bool,
    /// Keep stdin open.
    pub open_stdin: bool,
    /// Attach stdin.
    pub attach_stdin: bool,
    /// Attach stdout.
    pub attach_stdout: bool,
    /// Attach stderr.
    pub attach_stderr: bool,
}

/// Request/response access to a container engine.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// List all images known to the engine.
    async fn list_images(&self) -> Result<Vec<ImageSummary>>;

    /// List all containers known to the engine, running or not.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Create a container and return its id. The container is not started.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String>;

    /// Start a previously created container.
    async fn start_container(&self, id: &str) -> Result<()>;
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
