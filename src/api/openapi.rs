//! OpenAPI document for the HTTP surface.
//!
//! Endpoints are annotated with `#[utoipa::path]` next to their handlers;
//! this module only aggregates them and serves the generated document.

use axum::Json;
use utoipa::OpenApi;

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "muster",
        description = "Troop membership and activity tracker"
    ),
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::users::me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::delete_user,
        handlers::users::add_achievement,
        handlers::events::create_event,
        handlers::events::list_events,
        handlers::events::delete_event,
        handlers::events::assign_user,
        handlers::events::join_event,
        handlers::stats::stats,
    ),
    components(schemas(
        crate::roster::model::Role,
        crate::roster::model::AccountView,
        crate::roster::model::EventView,
        crate::roster::model::Stats,
        handlers::auth::RegisterRequest,
        handlers::auth::LoginRequest,
        handlers::auth::SessionGrant,
        handlers::users::CreateUserRequest,
        handlers::users::AchievementRequest,
        handlers::events::CreateEventRequest,
        handlers::events::AssignUserRequest,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
