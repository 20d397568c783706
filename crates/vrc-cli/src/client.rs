//! HTTP client for the provisioner API.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;
use vrc_core::{ProvisionRequest, ProvisionResult};

/// Errors talking to the provisioner.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to POST to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to POST to {url} - {status}{}", message_suffix(.message))]
    Status {
        url: String,
        status: StatusCode,
        message: Option<String>,
    },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" - {m}"))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Provisioner API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl ApiClient {
    /// Create a client for the API at `endpoint`.
    pub fn new(endpoint: Url, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint, token)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: Client, endpoint: Url, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint,
            token: token.into(),
        }
    }

    /// `<endpoint>/vrc`, keeping any path prefix of the endpoint.
    pub fn provision_url(&self) -> String {
        format!("{}/vrc", self.endpoint.as_str().trim_end_matches('/'))
    }

    /// Ask the server to make sure `image_name` has a running container.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for any non-success response, carrying
    /// the server's `error` message when it sent one.
    pub async fn provision(&self, image_name: &str) -> Result<ProvisionResult, ClientError> {
        let url = self.provision_url();
        let request_error = |source| ClientError::Request {
            url: url.clone(),
            source,
        };

        tracing::debug!(%url, image = %image_name, "Requesting container");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&ProvisionRequest {
                image_name: image_name.to_string(),
            })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.error);
            tracing::debug!(%status, ?message, "Provisioning request rejected");
            return Err(ClientError::Status {
                url: url.clone(),
                status,
                message,
            });
        }

        response.json().await.map_err(request_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(server.base_url().parse().unwrap(), "s3cret")
    }

    #[test]
    fn test_provision_url_keeps_prefix() {
        let c = ApiClient::new("http://host:3000/api/".parse().unwrap(), "t");
        assert_eq!(c.provision_url(), "http://host:3000/api/vrc");

        let c = ApiClient::new("http://host:3000".parse().unwrap(), "t");
        assert_eq!(c.provision_url(), "http://host:3000/vrc");
    }

    #[tokio::test]
    async fn test_provision_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/vrc")
                    .header("authorization", "Bearer s3cret")
                    .json_body(json!({ "imageName": "thunderbolt" }));
                then.status(201).json_body(json!({
                    "containerId": "c0ffee",
                    "imageId": "sha256:1",
                    "imageRepoTag": "thunderbolt:latest",
                    "dockerHost": "ssh://ubuntu@203.0.113.7"
                }));
            })
            .await;

        let result = client(&server).provision("thunderbolt").await.unwrap();
        mock.assert_async().await;
        assert_eq!(result.container_id, "c0ffee");
        assert_eq!(result.docker_host, "ssh://ubuntu@203.0.113.7");
    }

    #[tokio::test]
    async fn test_provision_error_carries_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/vrc");
                then.status(400)
                    .json_body(json!({ "error": "image nope is unavailable" }));
            })
            .await;

        let err = client(&server).provision("nope").await.unwrap_err();
        match &err {
            ClientError::Status {
                status, message, ..
            } => {
                assert_eq!(*status, StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("image nope is unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().ends_with("400 Bad Request - image nope is unavailable"));
    }

    #[tokio::test]
    async fn test_provision_error_without_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/vrc");
                then.status(502).body("bad gateway");
            })
            .await;

        let err = client(&server).provision("web").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { message: None, .. }));
        assert!(err.to_string().ends_with("502 Bad Gateway"));
    }
}
