//! # vrc-server
//!
//! HTTP provisioner for VRC. Exposes one endpoint that maps an image name
//! to a running container on the local container engine and tells the
//! caller how to reach it.
//!
//! ## Endpoints
//!
//! - `GET /` - liveness text
//! - `POST /vrc` - `{"imageName": "..."}` → container + docker host
//!
//! Every route is behind bearer-token authorization.

pub mod auth;
pub mod config;
pub mod error;
pub mod host;
pub mod http;

pub use auth::AllowedTokens;
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use host::HostError;
pub use http::AppState;
