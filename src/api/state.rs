//! Application state for shared services

use std::sync::Arc;

use crate::domain::registration::{RegistrationOutcome, RegistrationPayload};
use crate::domain::user::{User, UserRepository, UserStatus};
use crate::domain::DomainError;
use crate::infrastructure::account::{AccountService, RegistrationResult};
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError>;
}

/// Trait for sign-up operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn validate(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationOutcome, DomainError>;
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationResult, DomainError>;
    async fn count_customers(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + ?Sized + 'static,
    H: PasswordHasher + ?Sized + 'static,
{
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, username, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        UserService::count(self, status).await
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn validate(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationOutcome, DomainError> {
        AccountService::validate(self, payload).await
    }

    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationResult, DomainError> {
        AccountService::register(self, payload).await
    }

    async fn count_customers(&self) -> Result<usize, DomainError> {
        AccountService::count_customers(self).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        account_service: Arc<dyn AccountServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            account_service,
            jwt_service,
        }
    }
}
