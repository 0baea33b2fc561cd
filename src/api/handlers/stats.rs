//! Aggregate stats endpoint, leader-only.

use axum::{extract::Extension, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;

use super::{bearer_token, ApiError};
use crate::access::Access;

/// Aggregate counts over the registry; leader-only.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Totals for users, events, and leaders"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
    ),
    tag = "stats"
)]
pub async fn stats(
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    let stats = access.stats(&token)?;
    Ok(Json(stats))
}
