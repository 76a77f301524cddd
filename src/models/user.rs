//! User model, bearer-token claims and the caller authorization policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Hashed password (argon2)
    #[serde(skip_serializing, default)]
    pub password: String,
    pub is_approved: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    pub phone_number: Option<String>,
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

/// Update user request (owner or admin)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Please include a valid email"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Grant or revoke the administrator flag (admin only)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    pub is_admin: bool,
}

/// Resolved identity of the caller of an operation.
///
/// Every authorization decision is made from this value alone, passed
/// explicitly into each service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: i32,
    pub is_admin: bool,
}

impl CallerIdentity {
    /// True when the caller owns the resource or is an administrator
    pub fn can_access(&self, owner_id: i32) -> bool {
        self.is_admin || self.user_id == owner_id
    }

    /// Require administrator privileges
    pub fn require_admin(&self, message: &str) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Authorization(message.to_string()))
        }
    }

    /// Require ownership of the resource, or administrator privileges
    pub fn require_owner_or_admin(&self, owner_id: i32, message: &str) -> Result<(), AppError> {
        if self.can_access(owner_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(message.to_string()))
        }
    }
}

impl From<&User> for CallerIdentity {
    fn from(user: &User) -> Self {
        CallerIdentity {
            user_id: user.id,
            is_admin: user.is_admin,
        }
    }
}

/// JWT claims for authenticated users.
///
/// Only the user id and expiry; roles are read from the store on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, lifetime_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.id.to_string(),
            user_id: user.id,
            exp: now + (lifetime_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
