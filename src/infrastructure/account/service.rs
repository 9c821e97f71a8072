//! Account service: validation and persistence of sign-ups

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::customer::{Customer, CustomerRepository};
use crate::domain::password_policy::PasswordPolicy;
use crate::domain::registration::{
    CleanedRegistration, Contact, FieldError, FieldErrors, RegistrationField, RegistrationOutcome,
    RegistrationPayload, RegistrationValidator,
};
use crate::domain::user::{NewUser, User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::PasswordHasher;

/// Records created by a successful sign-up
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredAccount {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

/// Outcome of a sign-up attempt that reached the store without failing
#[derive(Debug, Clone)]
pub enum RegistrationResult {
    Registered(RegisteredAccount),
    Rejected(FieldErrors),
}

/// Validates sign-ups and creates the matching records
#[derive(Debug)]
pub struct AccountService {
    validator: RegistrationValidator,
    users: Arc<dyn UserRepository>,
    customers: Arc<dyn CustomerRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        customers: Arc<dyn CustomerRepository>,
        policy: Arc<dyn PasswordPolicy>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            validator: RegistrationValidator::new(users.clone(), customers.clone(), policy),
            users,
            customers,
            hasher,
        }
    }

    /// Number of stored customers
    pub async fn count_customers(&self) -> Result<usize, DomainError> {
        self.customers.count().await
    }

    /// Run validation only; nothing is stored
    pub async fn validate(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationOutcome, DomainError> {
        self.validator.validate(payload).await
    }

    /// Validate, then create the user and, for phone sign-ups, the customer
    ///
    /// A unique-index rejection at insert time (a concurrent sign-up won the
    /// race) comes back as a field error, like the validation-time check.
    pub async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationResult, DomainError> {
        let cleaned = match self.validator.validate(payload).await? {
            RegistrationOutcome::Valid(cleaned) => cleaned,
            RegistrationOutcome::Invalid(errors) => {
                return Ok(RegistrationResult::Rejected(errors));
            }
        };

        let contact = cleaned.contact();
        let user = self.build_user(&cleaned, &contact)?;

        let user = match self.users.create(user).await {
            Ok(user) => user,
            Err(DomainError::Conflict {
                field: Some(field),
                message,
            }) => {
                warn!(%message, "Sign-up lost a uniqueness race");
                return Ok(RegistrationResult::Rejected(conflict_errors(field, &contact)));
            }
            Err(e) => return Err(e),
        };

        let customer = match contact.phone() {
            Some(phone) => match self.create_customer(&user, phone).await? {
                Some(customer) => Some(customer),
                None => {
                    return Ok(RegistrationResult::Rejected(
                        (RegistrationField::EmailPhone, FieldError::duplicate_phone()).into(),
                    ));
                }
            },
            None => None,
        };

        info!(user_id = %user.id(), username = %user.username(), "Account registered");

        Ok(RegistrationResult::Registered(RegisteredAccount { user, customer }))
    }

    fn build_user(
        &self,
        cleaned: &CleanedRegistration,
        contact: &Contact,
    ) -> Result<User, DomainError> {
        let password_hash = self.hasher.hash(cleaned.password())?;

        Ok(User::new(NewUser {
            username: cleaned.username().to_string(),
            email: contact.email().map(String::from),
            first_name: cleaned.first_name().to_string(),
            last_name: cleaned.last_name().to_string(),
            password_hash,
        }))
    }

    /// `Ok(None)` when the phone was taken in the meantime; the user row is
    /// removed again on any failure
    async fn create_customer(
        &self,
        user: &User,
        phone: &str,
    ) -> Result<Option<Customer>, DomainError> {
        match self.customers.create(Customer::new(*user.id(), phone)).await {
            Ok(customer) => Ok(Some(customer)),
            Err(e) => {
                self.discard_user(user).await;

                match e {
                    DomainError::Conflict { .. } => Ok(None),
                    other => Err(other),
                }
            }
        }
    }

    async fn discard_user(&self, user: &User) {
        if let Err(e) = self.users.delete(user.id()).await {
            error!(user_id = %user.id(), error = %e, "Failed to remove user after customer insert failed");
        }
    }
}

fn conflict_errors(field: &str, contact: &Contact) -> FieldErrors {
    match (field, contact) {
        ("username", _) => (RegistrationField::Username, FieldError::duplicate_username()).into(),
        (_, Contact::Email(_)) => (RegistrationField::EmailPhone, FieldError::duplicate_email()).into(),
        (_, Contact::Phone(_)) => (RegistrationField::EmailPhone, FieldError::duplicate_phone()).into(),
    }
}
