//! Book (catalog entry) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::parse_datetime;
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub publication_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    /// Publication date (YYYY-MM-DD or RFC 3339)
    pub publication_date: Option<String>,
    pub description: Option<String>,
}

/// Update book request, only the provided fields change
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub publication_date: Option<String>,
    pub description: Option<String>,
}

impl CreateBook {
    pub fn parsed_publication_date(&self) -> AppResult<Option<DateTime<Utc>>> {
        self.publication_date
            .as_deref()
            .map(|s| parse_datetime(s, "publicationDate"))
            .transpose()
    }
}

impl UpdateBook {
    pub fn parsed_publication_date(&self) -> AppResult<Option<DateTime<Utc>>> {
        self.publication_date
            .as_deref()
            .map(|s| parse_datetime(s, "publicationDate"))
            .transpose()
    }
}
