//! # vrc-cli
//!
//! Client for the VRC provisioner: asks the server to run an image, then
//! opens the resulting container in a local editor.

pub mod cli;
pub mod client;
pub mod config;
pub mod editor;

pub use client::{ApiClient, ClientError};
pub use config::{CliConfig, ConfigError};
pub use editor::{DetachedEditor, EditorError};
