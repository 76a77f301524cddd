//! Repository layer for database operations.
//!
//! Services depend on the store traits below rather than on the Postgres
//! repositories directly, so each can be swapped for a mock in tests.

pub mod books;
pub mod notifications;
pub mod reservations;
pub mod users;

#[cfg(test)]
pub(crate) mod test_db_error;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook, UpdateBook},
        notification::{NewNotification, Notification},
        reservation::{NewReservation, Reservation, ReservationDetails, StatusTransition},
        user::{RegisterUser, UpdateUser, User},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `NotFound("User not found")`
    async fn get_by_id(&self, id: i32) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn list(&self) -> AppResult<Vec<User>>;
    /// Insert an unapproved, non-admin user
    async fn create(&self, user: &RegisterUser, password_hash: &str) -> AppResult<User>;
    async fn update(&self, id: i32, user: &UpdateUser) -> AppResult<User>;
    async fn set_approved(&self, id: i32, approved: bool) -> AppResult<User>;
    async fn set_admin(&self, id: i32, is_admin: bool) -> AppResult<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Fails with `NotFound("Book not found")`
    async fn get_by_id(&self, id: i32) -> AppResult<Book>;
    async fn list(&self) -> AppResult<Vec<Book>>;
    async fn create(&self, book: &CreateBook) -> AppResult<Book>;
    async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create(&self, reservation: &NewReservation) -> AppResult<Reservation>;
    /// Reservation with owner name and book title joined in.
    /// Fails with `NotFound("Reservation not found")`
    async fn get_details(&self, id: i32) -> AppResult<ReservationDetails>;
    async fn list_details(&self) -> AppResult<Vec<ReservationDetails>>;
    async fn list_details_for_user(&self, user_id: i32) -> AppResult<Vec<ReservationDetails>>;
    /// Apply a status change in a single statement
    async fn update_status(&self, id: i32, transition: &StatusTransition) -> AppResult<Reservation>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification>;
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Notification>>;
    /// Fails with `NotFound` unless the notification belongs to `user_id`
    async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<Notification>;
}

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookCatalog>,
    pub reservations: Arc<dyn ReservationStore>,
    pub notifications: Arc<dyn NotificationStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            reservations: Arc::new(reservations::ReservationsRepository::new(pool.clone())),
            notifications: Arc::new(notifications::NotificationsRepository::new(pool.clone())),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
