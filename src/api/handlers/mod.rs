//! HTTP handlers and the error-kind → status-code mapping.

pub mod auth;
pub mod events;
pub mod health;
pub mod stats;
pub mod users;

use axum::{
    Json,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::auth::token::TokenError;
use crate::error::Error;

/// Core error kinds translated to status codes; the body carries only the
/// stable message, never internals.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Unauthenticated(_) | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateIdentity | Error::RoleMismatch | Error::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::StorageUnavailable => {
                error!("storage unavailable while handling request");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

/// Pull the session token from the `Authorization: Bearer` header.
///
/// # Errors
///
/// Returns [`Error::Unauthenticated`] when the header is missing or empty, so
/// anonymous calls read the same as invalid tokens.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    extract_bearer_token(headers)
        .ok_or_else(|| ApiError(Error::Unauthenticated(TokenError::Malformed)))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
