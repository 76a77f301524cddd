//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserStore;
use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterUser, UpdateUser, User},
};

/// Map the unique email index violation to a conflict
fn email_taken(error: sqlx::Error, message: &str) -> AppError {
    match error {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        other => AppError::Database(other),
    }
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn set_flag(&self, id: i32, column: &str, value: bool) -> AppResult<User> {
        let query = format!("UPDATE users SET {} = $1 WHERE id = $2 RETURNING *", column);
        sqlx::query_as::<_, User>(&query)
            .bind(value)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    /// Get user by ID
    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get user by email (authentication)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check if email already exists
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)")
                .bind(email)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Create a new user, unapproved and without admin rights
    async fn create(&self, user: &RegisterUser, password_hash: &str) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone_number, password, is_approved, is_admin)
            VALUES ($1, $2, $3, $4, FALSE, FALSE)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| email_taken(e, "User already exists"))?;

        Ok(created)
    }

    /// Update an existing user
    async fn update(&self, id: i32, user: &UpdateUser) -> AppResult<User> {
        let mut sets = Vec::new();
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(user.name, "name");
        add_field!(user.email, "email");
        add_field!(user.phone_number, "phone_number");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, User>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(user.name);
        bind_field!(user.email);
        bind_field!(user.phone_number);

        builder
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| email_taken(e, "Email already in use"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn set_approved(&self, id: i32, approved: bool) -> AppResult<User> {
        self.set_flag(id, "is_approved", approved).await
    }

    async fn set_admin(&self, id: i32, is_admin: bool) -> AppResult<User> {
        self.set_flag(id, "is_admin", is_admin).await
    }
}
