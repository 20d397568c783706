//! Bearer-token authorization middleware.

use crate::error::ApiError;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashSet;
use std::sync::Arc;

/// Tokens accepted by [`require_bearer`]. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct AllowedTokens {
    tokens: HashSet<String>,
}

impl AllowedTokens {
    /// Build the set from any token source.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether `token` is allowed.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }
}

/// Reject requests without `Authorization: Bearer <allowed token>`.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_bearer(
    State(tokens): State<Arc<AllowedTokens>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check_authorization(&tokens, req.headers().get(AUTHORIZATION).map(|v| v.to_str()))?;
    Ok(next.run(req).await)
}

fn check_authorization(
    tokens: &AllowedTokens,
    header: Option<Result<&str, axum::http::header::ToStrError>>,
) -> Result<(), ApiError> {
    let Some(header) = header else {
        tracing::debug!("Rejected request without authorization header");
        return Err(ApiError::unauthorized("Authorization header is missing"));
    };

    let (scheme, token) = header
        .ok()
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, token)| !scheme.is_empty() && !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Missing token type or token"))?;

    if scheme.eq_ignore_ascii_case("bearer") && tokens.contains(token) {
        return Ok(());
    }

    tracing::debug!(scheme = %scheme, "Rejected request with invalid token");
    Err(ApiError::unauthorized("Invalid authorization token"))
}
