//! In-memory container engine for tests.

use crate::engine::{ContainerEngine, ContainerSpec, ContainerSummary, ImageSummary};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FakeState {
    images: Vec<ImageSummary>,
    containers: Vec<ContainerSummary>,
    last_spec: Option<ContainerSpec>,
}

/// A [`ContainerEngine`] holding images and containers in memory.
///
/// Counts create/start calls so tests can assert on side effects.
#[derive(Debug, Default)]
pub struct FakeEngine {
    state: Mutex<FakeState>,
    create_calls: AtomicUsize,
    start_calls: AtomicUsize,
    lose_created: bool,
    failure: Option<String>,
}

impl FakeEngine {
    /// Empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image with the given tags.
    pub fn with_image(self, id: &str, tags: &[&str]) -> Self {
        self.state().images.push(ImageSummary {
            id: id.to_string(),
            repo_tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    /// Add a container created from `image_id`.
    pub fn with_container(self, id: &str, image_id: &str) -> Self {
        self.state().containers.push(ContainerSummary {
            id: id.to_string(),
            image_id: image_id.to_string(),
        });
        self
    }

    /// Created containers never show up in listings.
    pub fn losing_created_containers(mut self) -> Self {
        self.lose_created = true;
        self
    }

    /// Every call fails with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Number of `create_container` calls so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `start_container` calls so far.
    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    /// The spec passed to the latest `create_container` call.
    pub fn last_spec(&self) -> Option<ContainerSpec> {
        self.state().last_spec.clone()
    }

    /// Current container listing.
    pub fn containers(&self) -> Vec<ContainerSummary> {
        self.state().containers.clone()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(CoreError::Malformed(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        self.check()?;
        Ok(self.state().images.clone())
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        self.check()?;
        Ok(self.state().containers.clone())
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        self.check()?;
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("fake-container-{n}");

        let mut state = self.state();
        state.last_spec = Some(spec.clone());
        let image_id = state
            .images
            .iter()
            .find(|image| image.id == spec.image || image.repo_tags.contains(&spec.image))
            .map(|image| image.id.clone())
            .ok_or_else(|| CoreError::CommandFailed {
                command: "create".into(),
                stderr: format!("No such image: {}", spec.image),
            })?;

        if !self.lose_created {
            state.containers.push(ContainerSummary {
                id: id.clone(),
                image_id,
            });
        }
        Ok(id)
    }

    async fn start_container(&self, _id: &str) -> Result<()> {
        self.check()?;
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
