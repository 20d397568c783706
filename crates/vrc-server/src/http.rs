//! HTTP routes for the provisioner.
//!
//! ## Endpoints
//!
//! - `GET /` - returns `Hello World!`
//! - `POST /vrc` - ensure an image has a running container
//!
//! Both sit behind [`require_bearer`].

use crate::auth::{require_bearer, AllowedTokens};
use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use vrc_core::{Outcome, ProvisionError, ProvisionRequest, ProvisionResult, Provisioner};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    provisioner: Provisioner,
    docker_host: Arc<str>,
}

impl AppState {
    /// Create handler state from a provisioner and the advertised docker host.
    pub fn new(provisioner: Provisioner, docker_host: impl Into<Arc<str>>) -> Self {
        Self {
            provisioner,
            docker_host: docker_host.into(),
        }
    }
}

/// Build the HTTP router.
///
/// Authorization runs before routing and body parsing, so unknown paths
/// and unparseable bodies are also answered with 401 when unauthenticated.
pub fn build_router(state: AppState, tokens: Arc<AllowedTokens>) -> Router {
    tracing::debug!("Building HTTP router");

    Router::new()
        .route("/", get(root_handler))
        .route("/vrc", post(provision_handler))
        .with_state(state)
        .layer(middleware::from_fn_with_state(tokens, require_bearer))
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> impl IntoResponse {
    "Hello World!"
}

/// `POST /vrc`
async fn provision_handler(
    State(state): State<AppState>,
    body: Result<Json<ProvisionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProvisionResult>), ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::info!(error = %rejection.body_text(), "Rejected provisioning body");
        ApiError::bad_request(rejection.body_text())
    })?;

    let provisioned = state
        .provisioner
        .provision(&request.image_name)
        .await
        .map_err(|err| {
            if let ProvisionError::ImageUnavailable(_) = err {
                tracing::info!(image = %request.image_name, "Image unavailable");
            } else {
                tracing::error!(image = %request.image_name, error = ?err, "Provisioning failed");
            }
            ApiError::from(err)
        })?;

    tracing::info!(
        image = %request.image_name,
        container_id = %provisioned.container.id,
        outcome = %provisioned.outcome,
        "Provisioned container"
    );

    let status = match provisioned.outcome {
        Outcome::Started => StatusCode::CREATED,
        Outcome::AlreadyRunning => StatusCode::OK,
    };

    Ok((
        status,
        Json(ProvisionResult {
            container_id: provisioned.container.id.clone(),
            image_id: provisioned.container.image_id.clone(),
            image_repo_tag: provisioned.image_repo_tag().to_string(),
            docker_host: state.docker_host.to_string(),
        }),
    ))
}

/// Start the HTTP server.
///
/// This function runs until the server is shut down via the provided
/// shutdown signal.
pub async fn serve(
    router: Router,
    addr: std::net::SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::debug!(%addr, "TCP listener bound");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
