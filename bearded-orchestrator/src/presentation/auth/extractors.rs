//! Authentication extractors for Axum (API key authentication)

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use bearded_core::domain::ids::UserId;

use super::resolver::{AuthError, IdentityResolver};
use crate::presentation::controllers::error_response;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct Auth {
    pub user_id: UserId,
}

/// State for authentication extractors, injected into request extensions
#[derive(Clone)]
pub struct AuthState {
    pub resolver: Arc<dyn IdentityResolver>,
}

impl AuthState {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

/// API key from `Authorization: Bearer <key>` or `X-API-Key: <key>`
fn extract_api_key(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .or_else(|| {
            parts
                .headers
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
        .filter(|key| !key.is_empty())
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = parts
            .extensions
            .get::<AuthState>()
            .cloned()
            .ok_or_else(|| AuthErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: AuthError::Unavailable {
                    message: "Auth state not found in request extensions".to_string(),
                },
            })?;

        let api_key = extract_api_key(parts).ok_or(AuthErrorResponse {
            status: StatusCode::UNAUTHORIZED,
            error: AuthError::MissingCredentials,
        })?;

        let user_id = auth_state
            .resolver
            .resolve(&api_key)
            .await
            .map_err(|error| AuthErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error,
            })?
            .ok_or(AuthErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: AuthError::InvalidApiKey,
            })?;

        Ok(Auth { user_id })
    }
}

/// Error response for authentication failures
#[derive(Debug)]
pub struct AuthErrorResponse {
    pub status: StatusCode,
    pub error: AuthError,
}

impl IntoResponse for AuthErrorResponse {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.error, "Authentication could not be performed");
            return error_response(self.status, "INTERNAL_ERROR", "Internal server error");
        }
        tracing::info!(reason = %self.error, "Request rejected by authentication");
        error_response(self.status, "UNAUTHORIZED", &self.error.to_string())
    }
}
