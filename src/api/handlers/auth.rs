//! Registration and login endpoints.
//!
//! Both return the account view together with a fresh session token; the raw
//! password is consumed here and never logged.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::ApiError;
use crate::access::Access;
use crate::roster::credentials::NewAccount;
use crate::roster::model::{AccountView, Role};

fn default_role() -> Role {
    Role::User
}

fn default_uniform() -> String {
    "Standard Scout Uniform".to_string()
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_uniform")]
    pub uniform_required: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionGrant {
    pub account: AccountView,
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionGrant),
        (status = 400, description = "Invalid input, duplicate email, or role=chief"),
    ),
    tag = "auth"
)]
pub async fn register(
    access: Extension<Arc<Access>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (account, token) = access.register(NewAccount {
        email: payload.email,
        name: payload.name,
        password: payload.password,
        role: payload.role,
        uniform_required: payload.uniform_required,
    })?;
    info!(email = %account.email, role = %account.role, "account registered");
    Ok((StatusCode::CREATED, Json(SessionGrant { account, token })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = SessionGrant),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub async fn login(
    access: Extension<Arc<Access>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (account, token) = access.login(&payload.email, &payload.password)?;
    Ok((StatusCode::OK, Json(SessionGrant { account, token })))
}
