//! Reservation endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::reservation::{
        CreateReservation, Reservation, ReservationDetails, UpdateReservationStatus,
    },
    AppState,
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List every reservation (admin)
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reservations", body = Vec<ReservationDetails>),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    caller.require_admin("Admin access required")?;

    let reservations = state.services.reservations.list_reservations(&caller).await?;
    Ok(Json(reservations))
}

/// Get one reservation (owner or admin)
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation with user and book", body = ReservationDetails),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ReservationDetails>> {
    let reservation = state.services.reservations.get_reservation(&caller, id).await?;
    Ok(Json(reservation))
}

/// Reserve a book. The reservation starts out pending.
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 200, description = "Reservation created", body = Reservation),
        (status = 400, description = "Invalid dates", body = crate::error::ErrorResponse),
        (status = 403, description = "Account pending approval", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppJson(request): AppJson<CreateReservation>,
) -> AppResult<Json<Reservation>> {
    let reservation = state
        .services
        .reservations
        .create_reservation(&caller, request)
        .await?;
    Ok(Json(reservation))
}

/// Change a reservation status (admin). Approving opens a two-day window
/// starting now.
#[utoipa::path(
    put,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateReservationStatus,
    responses(
        (status = 200, description = "Reservation updated", body = Reservation),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<UpdateReservationStatus>,
) -> AppResult<Json<Reservation>> {
    let reservation = state
        .services
        .reservations
        .update_reservation_status(&caller, id, request.status)
        .await?;
    Ok(Json(reservation))
}

/// List the reservations of one user (the user themself or an admin)
#[utoipa::path(
    get,
    path = "/users/{id}/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User reservations", body = Vec<ReservationDetails>),
        (status = 403, description = "Not authorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_user_reservations(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(user_id): AppPath<i32>,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    let reservations = state
        .services
        .reservations
        .list_user_reservations(&caller, user_id)
        .await?;
    Ok(Json(reservations))
}
