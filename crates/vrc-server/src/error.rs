//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use vrc_core::ProvisionError;

/// An error returned to the caller as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Build an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message placed in the body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match &err {
            ProvisionError::ImageUnavailable(_) => Self::bad_request(err.to_string()),
            ProvisionError::StartFailed(_) => Self::internal(err.to_string()),
            ProvisionError::Engine(_) => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrc_core::CoreError;

    #[test]
    fn test_provision_error_statuses() {
        let unavailable = ApiError::from(ProvisionError::ImageUnavailable("x".into()));
        assert_eq!(unavailable.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unavailable.message(), "image x is unavailable");

        let failed = ApiError::from(ProvisionError::StartFailed("x".into()));
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let engine = ApiError::from(ProvisionError::Engine(CoreError::Malformed("bad".into())));
        assert_eq!(engine.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(engine.message(), "unexpected engine response: bad");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::unauthorized("nope").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
