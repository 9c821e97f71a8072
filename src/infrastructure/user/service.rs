//! User service for authentication and lookups

use std::sync::Arc;

use tracing::debug;

use crate::domain::user::{User, UserId, UserRepository, UserStatus};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// User service for login and profile lookups
#[derive(Debug)]
pub struct UserService<R: UserRepository + ?Sized, H: PasswordHasher + ?Sized> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository + ?Sized, H: PasswordHasher + ?Sized> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Authenticate with username (any case) and password
    ///
    /// Unknown users, suspended users and wrong passwords all yield `Ok(None)`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_username(username.trim()).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !user.is_active() {
            debug!(user_id = %user.id(), "Login refused for inactive user");
            return Ok(None);
        }

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        self.repository.record_login(user.id()).await?;

        // Re-fetch to pick up last_login_at
        self.repository.get(user.id()).await
    }

    /// Get a user by the textual form of their ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_username(username).await
    }

    pub async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        self.repository.count(status).await
    }
}
