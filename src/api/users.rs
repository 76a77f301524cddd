//! User management endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{UpdateRole, UpdateUser, User},
    AppState,
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List all users (admin)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users(&caller).await?;
    Ok(Json(users))
}

/// Get user details by ID (the user themself or an admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 403, description = "Not authorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(&caller, id).await?;
    Ok(Json(user))
}

/// Update name, email or phone number
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input or email in use", body = crate::error::ErrorResponse),
        (status = 403, description = "Not authorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(update): AppJson<UpdateUser>,
) -> AppResult<Json<User>> {
    update.validate()?;

    let updated = state.services.users.update_user(&caller, id, update).await?;
    Ok(Json(updated))
}

/// Approve a pending account (admin). Also served at `/users/approve/{id}`.
#[utoipa::path(
    put,
    path = "/users/{id}/approve",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User approved", body = User),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_user(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<User>> {
    let user = state.services.users.approve_user(&caller, id).await?;
    Ok(Json(user))
}

/// Grant or revoke administrator rights (admin)
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 400, description = "Cannot revoke own admin rights", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(role): AppJson<UpdateRole>,
) -> AppResult<Json<User>> {
    let user = state.services.users.set_admin(&caller, id, role.is_admin).await?;
    Ok(Json(user))
}
