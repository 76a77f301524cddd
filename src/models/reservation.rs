//! Reservation model, status values and the approval window

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use super::parse_datetime;
use crate::error::AppResult;

/// Length of the active period granted when a reservation is approved
pub const APPROVAL_WINDOW_DAYS: i64 = 2;

/// Reservation status.
///
/// Only `approved` changes anything beyond the status itself; values the
/// server does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl ReservationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ReservationStatus::Approved)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ReservationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => ReservationStatus::Pending,
            "approved" => ReservationStatus::Approved,
            "rejected" => ReservationStatus::Rejected,
            _ => ReservationStatus::Other(s),
        }
    }
}

impl From<&str> for ReservationStatus {
    fn from(s: &str) -> Self {
        ReservationStatus::from(s.to_string())
    }
}

impl From<ReservationStatus> for String {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

// Stored as TEXT
impl sqlx::Type<Postgres> for ReservationStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for ReservationStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<Postgres>>::decode(value)?;
        Ok(ReservationStatus::from(s))
    }
}

impl Encode<'_, Postgres> for ReservationStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Reservation as stored; `user` and `book` are plain ids
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i32,
    #[serde(rename = "user")]
    pub user_id: i32,
    #[serde(rename = "book")]
    pub book_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[schema(value_type = String, example = "pending")]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Owner reference resolved at read time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationUser {
    pub id: i32,
    pub name: String,
}

/// Book reference resolved at read time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationBook {
    pub id: i32,
    pub title: String,
}

/// Reservation with owner name and book title
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetails {
    pub id: i32,
    pub user: ReservationUser,
    pub book: ReservationBook,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[schema(value_type = String, example = "approved")]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Internal row structure for joined reservation queries
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDetailsRow {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationDetailsRow> for ReservationDetails {
    fn from(row: ReservationDetailsRow) -> Self {
        ReservationDetails {
            id: row.id,
            user: ReservationUser {
                id: row.user_id,
                name: row.user_name,
            },
            book: ReservationBook {
                id: row.book_id,
                title: row.book_title,
            },
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Create reservation request.
///
/// Has no status field: new reservations are always pending.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservation {
    pub book_id: i32,
    /// Requested start (YYYY-MM-DD or RFC 3339), defaults to now
    pub start_date: Option<String>,
    /// Requested end (YYYY-MM-DD or RFC 3339)
    pub end_date: Option<String>,
}

/// Update reservation status request (admin only)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateReservationStatus {
    #[schema(value_type = String, example = "approved")]
    pub status: ReservationStatus,
}

/// Validated values for a new reservation row
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub user_id: i32,
    pub book_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl NewReservation {
    /// Caller supplied dates win; a missing start falls back to `now`
    pub fn from_request(
        user_id: i32,
        request: &CreateReservation,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let start_date = match request.start_date.as_deref() {
            Some(s) => parse_datetime(s, "startDate")?,
            None => now,
        };
        let end_date = request
            .end_date
            .as_deref()
            .map(|s| parse_datetime(s, "endDate"))
            .transpose()?;

        Ok(Self {
            user_id,
            book_id: request.book_id,
            start_date,
            end_date,
        })
    }
}

/// Active period of an approved reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ApprovalWindow {
    pub fn starting_at(approved_at: DateTime<Utc>) -> Self {
        Self {
            start: approved_at,
            end: approved_at + Duration::days(APPROVAL_WINDOW_DAYS),
        }
    }
}

/// A status change, with the dates it forces
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub status: ReservationStatus,
    pub window: Option<ApprovalWindow>,
}

impl StatusTransition {
    pub fn new(status: ReservationStatus, now: DateTime<Utc>) -> Self {
        let window = status.is_approved().then(|| ApprovalWindow::starting_at(now));
        Self { status, window }
    }
}
