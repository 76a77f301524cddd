//! Notification endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::notification::Notification, AppState};

use super::{AppPath, AuthenticatedUser};

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.services.notifications.list_mine(&caller).await?;
    Ok(Json(notifications))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Notification not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Notification>> {
    let notification = state.services.notifications.mark_read(&caller, id).await?;
    Ok(Json(notification))
}
