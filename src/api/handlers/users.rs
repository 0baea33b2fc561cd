//! Account endpoints: own profile, roster listing, privileged creation and
//! deletion, and achievement awards.

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
use crate::roster::credentials::NewAccount;
use crate::roster::model::Role;

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub uniform_required: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AchievementRequest {
    pub achievement: String,
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Caller's own profile"),
        (status = 401, description = "Missing or invalid session token"),
    ),
    tag = "users"
)]
pub async fn me(
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    let view = access.me(&token)?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts with derived event counts"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
    ),
    tag = "users"
)]
pub async fn list_users(
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    let views = access.list_accounts(&token)?;
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid input or duplicate email"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller may not create this account"),
    ),
    tag = "users"
)]
pub async fn create_user(
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    let view = access.create_account(
        &token,
        NewAccount {
            email: payload.email,
            name: payload.name,
            password: payload.password,
            role: payload.role,
            uniform_required: payload.uniform_required,
        },
    )?;
    info!(email = %view.email, role = %view.role, "account created");
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{email}",
    params(
        ("email" = String, Path, description = "Account email")
    ),
    responses(
        (status = 204, description = "Account deleted and scrubbed from all events"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
        (status = 404, description = "Account not found"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    Path(email): Path<String>,
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    access.delete_account(&token, &email)?;
    info!(email = %email, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/users/{email}/achievements",
    params(
        ("email" = String, Path, description = "Account email")
    ),
    request_body = AchievementRequest,
    responses(
        (status = 204, description = "Achievement appended"),
        (status = 400, description = "Empty achievement text"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 403, description = "Caller is not a leader"),
        (status = 404, description = "Account not found"),
    ),
    tag = "users"
)]
pub async fn add_achievement(
    Path(email): Path<String>,
    headers: HeaderMap,
    access: Extension<Arc<Access>>,
    Json(payload): Json<AchievementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)?;
    access.append_achievement(&token, &email, &payload.achievement)?;
    Ok(StatusCode::NO_CONTENT)
}
