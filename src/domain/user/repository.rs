//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId, UserStatus};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Username and e-mail lookups ignore case. `Ok(None)` means no matching
/// record; `Err` means the lookup itself failed and must not be read as
/// "not found".
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by username, ignoring case
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by e-mail address, ignoring case
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user; a username or e-mail collision is a `Conflict`
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user (used to undo a sign-up whose customer insert failed)
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Count users (optionally filtered by status)
    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError>;

    /// Check if a username is taken, ignoring case
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    /// Check if an e-mail address is taken, ignoring case
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Record a login for a user
    async fn record_login(&self, id: &UserId) -> Result<(), DomainError>;
}
