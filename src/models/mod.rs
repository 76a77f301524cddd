//! Data models for the library server

pub mod book;
pub mod notification;
pub mod reservation;
pub mod user;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use book::Book;
pub use notification::Notification;
pub use reservation::{Reservation, ReservationDetails, ReservationStatus};
pub use user::{CallerIdentity, User};

/// Parse a client supplied date, either RFC 3339 or a bare `YYYY-MM-DD`
/// (read as midnight UTC)
pub fn parse_datetime(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid {}", field)))
}
