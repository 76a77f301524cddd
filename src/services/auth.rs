//! Authentication service: registration, login and bearer-token resolution

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CallerIdentity, RegisterUser, User, UserClaims},
    repository::UserStore,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Register a new, unapproved user and return a token for it
    pub async fn register(&self, user: RegisterUser) -> AppResult<(String, User)> {
        if self.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.hash_password(&user.password)?;
        let created = self.users.create(&user, &password_hash).await?;
        tracing::info!(user_id = created.id, "User registered, awaiting approval");

        let token = self.create_token_for_user(&created)?;
        Ok((token, created))
    }

    /// Authenticate by email and password.
    ///
    /// The password is checked before the approval flag, so an unapproved
    /// account is only reported to someone holding its password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(&user, password)? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_approved {
            return Err(AppError::Authorization(
                "Your account is pending approval".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Resolve a bearer token into the caller identity.
    ///
    /// The token only proves who the caller is. The admin flag is loaded
    /// from the store, so a role change applies to tokens already issued.
    pub async fn resolve_caller(&self, token: &str) -> AppResult<CallerIdentity> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Authentication("Token is not valid".to_string())
        })?;

        match self.users.get_by_id(claims.user_id).await {
            Ok(user) => Ok(CallerIdentity::from(&user)),
            Err(AppError::NotFound(_)) => {
                tracing::debug!(user_id = claims.user_id, "Token for a deleted user");
                Err(AppError::Authentication("Token is not valid".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::new(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
        }
    }

    fn hashed(password: &str) -> String {
        AuthService::new(Arc::new(MockUserStore::new()), config())
            .hash_password(password)
            .unwrap()
    }

    fn user(id: i32, password_hash: String, is_approved: bool, is_admin: bool) -> User {
        User {
            id,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            phone_number: Some("01010101010".to_string()),
            password: password_hash,
            is_approved,
            is_admin,
            created_at: Utc::now(),
        }
    }

    fn registration() -> RegisterUser {
        RegisterUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            phone_number: Some("01010101010".to_string()),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_returns_token_for_new_user() {
        let mut store = MockUserStore::new();
        store
            .expect_email_exists()
            .with(eq("test@example.com"), eq(None::<i32>))
            .returning(|_, _| Ok(false));
        store
            .expect_create()
            .withf(|_, hash: &str| hash.starts_with("$argon2"))
            .returning(|_, hash| Ok(user(5, hash.to_string(), false, false)));
        store
            .expect_get_by_id()
            .with(eq(5))
            .returning(|id| Ok(user(id, String::new(), false, false)));

        let service = AuthService::new(Arc::new(store), config());
        let (token, created) = service.register(registration()).await.unwrap();

        assert_eq!(created.id, 5);
        assert!(!created.is_approved);
        assert_eq!(
            service.resolve_caller(&token).await.unwrap(),
            CallerIdentity { user_id: 5, is_admin: false }
        );
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut store = MockUserStore::new();
        store.expect_email_exists().returning(|_, _| Ok(true));
        store.expect_create().never();

        let service = AuthService::new(Arc::new(store), config());
        match service.register(registration()).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "User already exists"),
            other => panic!("unexpected result: {:?}", other.map(|(_, u)| u.id)),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut store = MockUserStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(store), config());
        let result = service.login("nonexistent@example.com", "wrongpassword").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let hash = hashed("password123");
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user(1, hash.clone(), true, false))));

        let service = AuthService::new(Arc::new(store), config());
        let result = service.login("test@example.com", "not-it").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unapproved_is_forbidden() {
        let hash = hashed("password123");
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user(1, hash.clone(), false, false))));

        let service = AuthService::new(Arc::new(store), config());
        match service.login("test@example.com", "password123").await {
            Err(AppError::Authorization(msg)) => {
                assert_eq!(msg, "Your account is pending approval")
            }
            other => panic!("unexpected result: {:?}", other.map(|(_, u)| u.id)),
        }
    }

    #[tokio::test]
    async fn test_login_approved_admin_resolves_as_admin() {
        let hash = hashed("password123");
        let mut store = MockUserStore::new();
        store
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user(9, hash.clone(), true, true))));
        store
            .expect_get_by_id()
            .with(eq(9))
            .returning(|id| Ok(user(id, String::new(), true, true)));

        let service = AuthService::new(Arc::new(store), config());
        let (token, _) = service.login("admin@example.com", "password123").await.unwrap();
        assert_eq!(
            service.resolve_caller(&token).await.unwrap(),
            CallerIdentity { user_id: 9, is_admin: true }
        );
    }

    #[tokio::test]
    async fn test_revoked_admin_loses_rights_with_existing_token() {
        let issued_as_admin = user(9, String::new(), true, true);
        let mut store = MockUserStore::new();
        store
            .expect_get_by_id()
            .with(eq(9))
            .returning(|id| Ok(user(id, String::new(), true, false)));

        let service = AuthService::new(Arc::new(store), config());
        let token = service.create_token_for_user(&issued_as_admin).unwrap();

        let caller = service.resolve_caller(&token).await.unwrap();
        assert_eq!(caller, CallerIdentity { user_id: 9, is_admin: false });
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_rejected() {
        let mut store = MockUserStore::new();
        store
            .expect_get_by_id()
            .returning(|_| Err(AppError::NotFound("User not found".to_string())));

        let service = AuthService::new(Arc::new(store), config());
        let token = service
            .create_token_for_user(&user(12, String::new(), true, false))
            .unwrap();

        match service.resolve_caller(&token).await {
            Err(AppError::Authentication(msg)) => assert_eq!(msg, "Token is not valid"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_caller_rejects_garbage() {
        let mut store = MockUserStore::new();
        store.expect_get_by_id().never();

        let service = AuthService::new(Arc::new(store), config());
        match service.resolve_caller("not-a-jwt").await {
            Err(AppError::Authentication(msg)) => assert_eq!(msg, "Token is not valid"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
