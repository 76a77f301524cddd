//! Reservations repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::ReservationStore;
use crate::{
    error::{AppError, AppResult},
    models::reservation::{
        NewReservation, Reservation, ReservationDetails, ReservationDetailsRow, StatusTransition,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.name AS user_name, r.book_id, b.title AS book_title,
           r.start_date, r.end_date, r.status, r.created_at
    FROM reservations r
    JOIN users u ON u.id = r.user_id
    JOIN books b ON b.id = r.book_id
"#;

/// The owner or the book can disappear between the service checks and the
/// insert; report that as the missing row instead of a server error.
fn insert_error(error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            if db.constraint() == Some("reservations_user_id_fkey") {
                AppError::NotFound("User not found".to_string())
            } else {
                AppError::NotFound("Book not found".to_string())
            }
        }
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationsRepository {
    /// Insert a new reservation; status always starts as pending
    async fn create(&self, reservation: &NewReservation) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, book_id, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING *
            "#,
        )
        .bind(reservation.user_id)
        .bind(reservation.book_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)?;
        Ok(row)
    }

    async fn get_details(&self, id: i32) -> AppResult<ReservationDetails> {
        let query = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, ReservationDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ReservationDetails::from)
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
    }

    async fn list_details(&self) -> AppResult<Vec<ReservationDetails>> {
        let query = format!("{} ORDER BY r.created_at DESC, r.id DESC", DETAILS_SELECT);
        let rows = sqlx::query_as::<_, ReservationDetailsRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReservationDetails::from).collect())
    }

    async fn list_details_for_user(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>> {
        let query = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.created_at DESC, r.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ReservationDetailsRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReservationDetails::from).collect())
    }

    /// Single UPDATE: status always, dates only when the transition carries
    /// an approval window. Owner and book are never touched.
    async fn update_status(&self, id: i32, transition: &StatusTransition) -> AppResult<Reservation> {
        let (start, end) = match transition.window {
            Some(window) => (Some(window.start), Some(window.end)),
            None => (None, None),
        };

        sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET
                status = $2,
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&transition.status)
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))
    }
}
