//! Notification model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Message left for a user when one of their reservations changes
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    #[serde(rename = "user")]
    pub user_id: i32,
    #[serde(rename = "reservation")]
    pub reservation_id: Option<i32>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: i32,
    pub reservation_id: Option<i32>,
    pub message: String,
}
