//! # vrc-core
//!
//! Container provisioning layer for VRC (virtual remote containers).
//!
//! This crate maps an image name to a running container on a container
//! engine, starting one when none exists yet.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     vrc-core                             │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  ┌─────────────────┐     ┌──────────────────────────┐   │
//! │  │  Provisioner    │────▶│  KeyedLocks              │   │
//! │  │  - provision()  │     │  (one mutex per image)   │   │
//! │  └─────────────────┘     └──────────────────────────┘   │
//! │           │                                              │
//! │           ▼                                              │
//! │  ┌─────────────────┐     ┌──────────────────────────┐   │
//! │  │ ContainerEngine │────▶│  DockerCli               │   │
//! │  │  (trait)        │     │  (`docker` binary)       │   │
//! │  └─────────────────┘     └──────────────────────────┘   │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vrc_core::{DockerCli, Outcome, Provisioner};
//!
//! # async fn example() -> Result<(), vrc_core::ProvisionError> {
//! let provisioner = Provisioner::new(Arc::new(DockerCli::new()));
//!
//! let provisioned = provisioner.provision("thunderbolt").await?;
//! if provisioned.outcome == Outcome::Started {
//!     println!("started {}", provisioned.container.id);
//! }
//! # Ok(())
//! # }
//! ```

mod docker;
mod engine;
mod error;
#[cfg(any(test, feature = "fake"))]
mod fake;
mod locks;
mod provisioner;
mod types;

pub use docker::DockerCli;
pub use engine::{ContainerEngine, ContainerSpec, ContainerSummary, ImageSummary};
pub use error::{CoreError, ProvisionError, Result};
#[cfg(any(test, feature = "fake"))]
pub use fake::FakeEngine;
pub use locks::KeyedLocks;
pub use provisioner::{Outcome, Provisioned, Provisioner, IDLE_COMMAND};
pub use types::{ProvisionRequest, ProvisionResult};
