//! Provisioner - ensure an image has a container and report it.

use crate::engine::{ContainerEngine, ContainerSpec, ContainerSummary, ImageSummary};
use crate::error::ProvisionError;
use crate::locks::KeyedLocks;
use std::fmt;
use std::sync::Arc;

/// Command run in provisioned containers: announce startup, then idle until
/// SIGTERM.
pub const IDLE_COMMAND: &str =
    r#"echo Container started ; trap "exit 0" 15; while sleep 1 & wait $! ; do : ; done"#;

/// Which path a provisioning call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A container for the image already existed.
    AlreadyRunning,
    /// A container was created and started by this call.
    Started,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "AlreadyRunning"),
            Self::Started => write!(f, "Started"),
        }
    }
}

/// Result of a successful provisioning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    /// Path taken.
    pub outcome: Outcome,
    /// The matched image.
    pub image: ImageSummary,
    /// The container serving it.
    pub container: ContainerSummary,
}

impl Provisioned {
    /// The image's primary `repository:tag`.
    pub fn image_repo_tag(&self) -> &str {
        self.image.primary_tag().unwrap_or_default()
    }
}

/// Maps image names to running containers on a [`ContainerEngine`].
///
/// Calls for the same image are serialized so that concurrent requests do
/// not each create a container. Nothing is cached: every call asks the
/// engine again.
#[derive(Clone)]
pub struct Provisioner {
    engine: Arc<dyn ContainerEngine>,
    locks: Arc<KeyedLocks>,
}

impl Provisioner {
    /// Create a provisioner over `engine`.
    pub fn new(engine: Arc<dyn ContainerEngine>) -> Self {
        Self {
            engine,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Ensure `image_name` has a container, starting one if needed.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::ImageUnavailable`] if no image carries that name
    /// - [`ProvisionError::StartFailed`] if no container shows up after
    ///   creating one
    /// - [`ProvisionError::Engine`] for any engine failure
    pub async fn provision(&self, image_name: &str) -> Result<Provisioned, ProvisionError> {
        let image = self
            .find_image(image_name)
            .await?
            .ok_or_else(|| ProvisionError::ImageUnavailable(image_name.to_string()))?;

        tracing::debug!(image = %image_name, image_id = %image.id, "Resolved image");

        let _guard = self.locks.lock(&image.id).await;

        if let Some(container) = self.find_container(&image.id).await? {
            tracing::info!(
                image = %image_name,
                container_id = %container.id,
                "Container already running"
            );
            return Ok(Provisioned {
                outcome: Outcome::AlreadyRunning,
                image,
                container,
            });
        }

        tracing::info!(image = %image_name, "No container for image, starting one");
        let spec = Self::container_spec(&image);
        let created = self.engine.create_container(&spec).await?;
        self.engine.start_container(&created).await?;

        match self.find_container(&image.id).await? {
            Some(container) => {
                tracing::info!(
                    image = %image_name,
                    container_id = %container.id,
                    "Container started"
                );
                Ok(Provisioned {
                    outcome: Outcome::Started,
                    image,
                    container,
                })
            }
            None => {
                tracing::warn!(image = %image_name, created_id = %created, "Started container not listed");
                Err(ProvisionError::StartFailed(image_name.to_string()))
            }
        }
    }

    /// First image with a tag named `name`.
    async fn find_image(&self, name: &str) -> Result<Option<ImageSummary>, ProvisionError> {
        let images = self.engine.list_images().await?;
        Ok(images.into_iter().find(|image| image.matches_name(name)))
    }

    /// First container, in any state, created from `image_id`.
    async fn find_container(
        &self,
        image_id: &str,
    ) -> Result<Option<ContainerSummary>, ProvisionError> {
        let containers = self.engine.list_containers().await?;
        Ok(containers.into_iter().find(|c| c.image_id == image_id))
    }

    /// Detached, TTY-backed container that idles until stopped.
    fn container_spec(image: &ImageSummary) -> ContainerSpec {
        ContainerSpec {
            image: image.primary_tag().unwrap_or(&image.id).to_string(),
            cmd: vec![
                "/bin/bash".to_string(),
                "-c".to_string(),
                IDLE_COMMAND.to_string(),
            ],
            tty: true,
            ..Default::default()
        }
    }
}
