//! Business logic services

pub mod auth;
pub mod catalog;
pub mod notifications;
pub mod reservations;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub reservations: reservations::ReservationsService,
    pub notifications: notifications::NotificationsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let notifications = notifications::NotificationsService::new(repository.notifications.clone());

        Self {
            auth: auth::AuthService::new(repository.users.clone(), auth_config),
            users: users::UsersService::new(repository.users.clone()),
            catalog: catalog::CatalogService::new(repository.books.clone()),
            reservations: reservations::ReservationsService::new(
                repository.reservations.clone(),
                repository.books.clone(),
                repository.users.clone(),
                notifications.clone(),
            ),
            notifications,
            repository,
        }
    }
}
