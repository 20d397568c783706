//! Error types for vrc-core.

use thiserror::Error;

/// Result type alias for container engine operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while talking to the container engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The engine CLI exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// Command line that was run
        command: String,
        /// Trimmed standard error of the command
        stderr: String,
    },

    /// The engine answered with something we could not interpret.
    #[error("unexpected engine response: {0}")]
    Malformed(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (engine binary missing, pipe failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by [`Provisioner::provision`](crate::Provisioner::provision).
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// No engine image carries the requested name.
    #[error("image {0} is unavailable")]
    ImageUnavailable(String),

    /// A container was requested but none showed up afterwards.
    #[error("Unable to start container for {0}")]
    StartFailed(String),

    /// Engine failure during any step.
    #[error(transparent)]
    Engine(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_error_messages() {
        assert_eq!(
            ProvisionError::ImageUnavailable("does-not-exist".into()).to_string(),
            "image does-not-exist is unavailable"
        );
        assert_eq!(
            ProvisionError::StartFailed("thunderbolt".into()).to_string(),
            "Unable to start container for thunderbolt"
        );
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err = ProvisionError::from(CoreError::Malformed("no id".into()));
        assert_eq!(err.to_string(), "unexpected engine response: no id");
    }
}
