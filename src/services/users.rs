//! User directory: listing, approval, roles and profile updates

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::user::{CallerIdentity, UpdateUser, User},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// List every user (admin only)
    pub async fn list_users(&self, caller: &CallerIdentity) -> AppResult<Vec<User>> {
        caller.require_admin("Admin access required")?;
        self.users.list().await
    }

    /// Get a user by ID (the user themself or an admin)
    pub async fn get_user(&self, caller: &CallerIdentity, id: i32) -> AppResult<User> {
        caller.require_owner_or_admin(id, "Not authorized to view this user")?;
        self.users.get_by_id(id).await
    }

    /// Update name, email or phone number (the user themself or an admin)
    pub async fn update_user(
        &self,
        caller: &CallerIdentity,
        id: i32,
        update: UpdateUser,
    ) -> AppResult<User> {
        caller.require_owner_or_admin(id, "Not authorized to update this user")?;
        self.users.get_by_id(id).await?;

        if let Some(ref email) = update.email {
            if self.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        self.users.update(id, &update).await
    }

    /// Approve a registered user so they can log in (admin only)
    pub async fn approve_user(&self, caller: &CallerIdentity, id: i32) -> AppResult<User> {
        caller.require_admin("Admin access required")?;
        let user = self.users.set_approved(id, true).await?;
        tracing::info!(user_id = id, approved_by = caller.user_id, "User approved");
        Ok(user)
    }

    /// Grant or revoke the admin flag (admin only). An admin cannot revoke
    /// their own flag.
    pub async fn set_admin(
        &self,
        caller: &CallerIdentity,
        id: i32,
        is_admin: bool,
    ) -> AppResult<User> {
        caller.require_admin("Admin access required")?;
        if caller.user_id == id && !is_admin {
            return Err(AppError::Validation(
                "Administrators cannot revoke their own admin rights".to_string(),
            ));
        }

        let user = self.users.set_admin(id, is_admin).await?;
        tracing::info!(user_id = id, is_admin, changed_by = caller.user_id, "User role changed");
        Ok(user)
    }
}
