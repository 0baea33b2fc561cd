//! Event endpoints: creation, listing, deletion, user assignment, and
//! leader self-join.

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::{bearer_token, ApiError};
use crate::access::Access;

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    pub event_name: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AssignUserRequest {
    pub user_email: String,
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created"),
        (status = 400, description = "Empty or duplicate event name"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
    ),
    tag = "events"
)]
pub async fn create_event(
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    let view = access.create_event(&token, &payload.event_name, &payload.date, &payload.description)?;
    info!(event = %view.event_name, "event created");
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "All events with membership sets"),
        (status = 401, description = "Missing or invalid session token"),
    ),
    tag = "events"
)]
pub async fn list_events(
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    let views = access.list_events(&token)?;
    Ok(Json(views))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_name}",
    params(
        ("event_name" = String, Path, description = "Event name")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
        (status = 404, description = "Event not found"),
    ),
    tag = "events"
)]
pub async fn delete_event(
    Path(event_name): Path<String>,
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    access.delete_event(&token, &event_name)?;
    info!(event = %event_name, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/events/{event_name}/assign-user",
    params(
        ("event_name" = String, Path, description = "Event name")
    ),
    request_body = AssignUserRequest,
    responses(
        (status = 204, description = "User assigned (idempotent)"),
        (status = 400, description = "Target account is not role=user"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
        (status = 404, description = "Event or account not found"),
    ),
    tag = "events"
)]
pub async fn assign_user(
    Path(event_name): Path<String>,
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
    Json(payload): Json<AssignUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    access.assign_user(&token, &event_name, &payload.user_email)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/events/{event_name}/join",
    params(
        ("event_name" = String, Path, description = "Event name")
    ),
    responses(
        (status = 204, description = "Caller joined as leader (idempotent)"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
        (status = 404, description = "Event not found"),
    ),
    tag = "events"
)]
pub async fn join_event(
    Path(event_name): Path<String>,
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    access.join_event(&token, &event_name)?;
    Ok(StatusCode::NO_CONTENT)
}
