//! Reservation engine: creation, status transitions and the access rules
//! around them.
//!
//! Every operation takes the caller identity explicitly. Authorization is
//! checked here even where the route already restricts access.

use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{
            CreateReservation, NewReservation, Reservation, ReservationDetails,
            ReservationStatus, StatusTransition,
        },
        user::CallerIdentity,
    },
    repository::{BookCatalog, ReservationStore, UserStore},
};

use super::notifications::NotificationsService;

#[derive(Clone)]
pub struct ReservationsService {
    reservations: Arc<dyn ReservationStore>,
    books: Arc<dyn BookCatalog>,
    users: Arc<dyn UserStore>,
    notifications: NotificationsService,
}

impl ReservationsService {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        books: Arc<dyn BookCatalog>,
        users: Arc<dyn UserStore>,
        notifications: NotificationsService,
    ) -> Self {
        Self {
            reservations,
            books,
            users,
            notifications,
        }
    }

    /// Create a pending reservation owned by the caller.
    ///
    /// No check is made against other reservations of the same book.
    pub async fn create_reservation(
        &self,
        caller: &CallerIdentity,
        request: CreateReservation,
    ) -> AppResult<Reservation> {
        let new = NewReservation::from_request(caller.user_id, &request, Utc::now())?;

        self.books.get_by_id(new.book_id).await?;

        let owner = self.users.get_by_id(caller.user_id).await?;
        if !owner.is_approved {
            return Err(AppError::Authorization(
                "Your account is pending approval".to_string(),
            ));
        }

        let reservation = self.reservations.create(&new).await?;
        tracing::info!(
            reservation_id = reservation.id,
            user_id = reservation.user_id,
            book_id = reservation.book_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// All reservations with owner name and book title. Not filtered by
    /// caller; the route restricts this to admins.
    pub async fn list_reservations(
        &self,
        _caller: &CallerIdentity,
    ) -> AppResult<Vec<ReservationDetails>> {
        self.reservations.list_details().await
    }

    /// Reservations of one user (the user themself or an admin)
    pub async fn list_user_reservations(
        &self,
        caller: &CallerIdentity,
        user_id: i32,
    ) -> AppResult<Vec<ReservationDetails>> {
        caller.require_owner_or_admin(user_id, "Not authorized to view these reservations")?;
        self.reservations.list_details_for_user(user_id).await
    }

    /// One reservation, visible to its owner and to admins
    pub async fn get_reservation(
        &self,
        caller: &CallerIdentity,
        id: i32,
    ) -> AppResult<ReservationDetails> {
        let reservation = self.reservations.get_details(id).await?;

        if !caller.can_access(reservation.user.id) {
            tracing::debug!(
                reservation_id = id,
                caller_id = caller.user_id,
                "Reservation view denied"
            );
            return Err(AppError::Authorization(
                "Not authorized to view this reservation".to_string(),
            ));
        }

        Ok(reservation)
    }

    /// Overwrite the status (admin only). Approval restarts the window at
    /// the time of this call: start = now, end = now + 2 days.
    pub async fn update_reservation_status(
        &self,
        caller: &CallerIdentity,
        id: i32,
        status: ReservationStatus,
    ) -> AppResult<Reservation> {
        if let Err(e) = caller.require_admin("Not authorized to update reservation status") {
            tracing::warn!(
                reservation_id = id,
                caller_id = caller.user_id,
                "Non-admin attempted a reservation status update"
            );
            return Err(e);
        }

        let transition = StatusTransition::new(status, Utc::now());
        let reservation = self.reservations.update_status(id, &transition).await?;
        tracing::info!(
            reservation_id = id,
            status = %reservation.status,
            changed_by = caller.user_id,
            "Reservation status updated"
        );

        if let Err(e) = self.notifications.reservation_status_changed(&reservation).await {
            tracing::warn!(reservation_id = id, "Failed to record notification: {}", e);
        }

        Ok(reservation)
    }
}
