//! Seed the administrator account described by the `[admin]` config section.
//!
//! An existing account with the same email is approved and promoted instead
//! of duplicated. Prints a token for the account on success.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use library_server::{
    config::AppConfig, models::user::RegisterUser, repository::Repository, services::Services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("library_server={},create_admin=info", config.logging.level).into()),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), config.auth.clone());
    let admin = &config.admin;

    let user = match repository.users.find_by_email(&admin.email).await? {
        Some(existing) => {
            tracing::info!(user_id = existing.id, "Admin account already exists, promoting");
            existing
        }
        None => {
            let hash = services.auth.hash_password(&admin.password)?;
            let registration = RegisterUser {
                name: admin.name.clone(),
                email: admin.email.clone(),
                phone_number: admin.phone_number.clone(),
                password: admin.password.clone(),
            };
            let created = repository.users.create(&registration, &hash).await?;
            tracing::info!(user_id = created.id, "Admin account created");
            created
        }
    };

    repository.users.set_approved(user.id, true).await?;
    let user = repository.users.set_admin(user.id, true).await?;
    let token = services.auth.create_token_for_user(&user)?;

    println!("Admin ready: {} (id {})", user.email, user.id);
    println!("Token: {}", token);

    Ok(())
}
