//! Sign-up validation pass
//!
//! Rules run in a fixed order so that the password policy always sees the
//! same context:
//!
//! 1. static rules for every field (required, length, character set)
//! 2. username uniqueness
//! 3. `email_phone` uniqueness (e-mail first, then phone)
//! 4. password policy, given the attributes cleaned so far
//! 5. password confirmation

use std::sync::Arc;

use tracing::debug;

use super::errors::{FieldError, FieldErrors, RegistrationField};
use super::payload::{CleanedRegistration, Contact, RegistrationPayload};
use crate::domain::customer::CustomerRepository;
use crate::domain::password_policy::{PasswordPolicy, UserAttributes};
use crate::domain::user::{
    validate_name, validate_username, UserRepository, UserValidationError, MAX_EMAIL_LENGTH,
    MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_NAME_LENGTH, MIN_USERNAME_LENGTH,
};
use crate::domain::DomainError;

/// Result of a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Valid(CleanedRegistration),
    Invalid(FieldErrors),
}

impl RegistrationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }
}

/// Validates sign-up submissions against the user and customer stores
#[derive(Debug, Clone)]
pub struct RegistrationValidator {
    users: Arc<dyn UserRepository>,
    customers: Arc<dyn CustomerRepository>,
    policy: Arc<dyn PasswordPolicy>,
}

impl RegistrationValidator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        customers: Arc<dyn CustomerRepository>,
        policy: Arc<dyn PasswordPolicy>,
    ) -> Self {
        Self {
            users,
            customers,
            policy,
        }
    }

    /// Run every rule over the submission
    ///
    /// User mistakes come back as `Ok(RegistrationOutcome::Invalid)`. A store
    /// lookup that fails is returned as `Err` and never counts as "not
    /// registered".
    pub async fn validate(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationOutcome, DomainError> {
        let mut errors = FieldErrors::new();

        let first_name = clean_name(RegistrationField::FirstName, payload, &mut errors);
        let last_name = clean_name(RegistrationField::LastName, payload, &mut errors);
        let username = clean_username_format(payload, &mut errors);
        let email_phone = clean_email_phone_format(payload, &mut errors);
        let password = required(RegistrationField::Password, payload, &mut errors);
        let confirmation = required(RegistrationField::PasswordConfirmation, payload, &mut errors);

        let username = match username {
            Some(username) => self.check_username_unique(username, &mut errors).await?,
            None => None,
        };

        let email_phone = match email_phone {
            Some(value) => self.check_email_phone_unique(value, &mut errors).await?,
            None => None,
        };

        let attributes = UserAttributes {
            username: username.clone(),
            email: email_phone
                .as_deref()
                .and_then(|value| Contact::classify(value).email().map(String::from)),
        };

        let password = password.and_then(|password| {
            self.check_password_policy(password, &attributes, &mut errors)
        });

        let confirmation =
            confirmation.and_then(|c| check_confirmation(c, password.as_deref(), &mut errors));

        debug!(
            failed_fields = ?errors.fields(),
            "Registration validation finished"
        );

        match (first_name, last_name, username, email_phone, password, confirmation) {
            (
                Some(first_name),
                Some(last_name),
                Some(username),
                Some(email_phone),
                Some(password),
                Some(confirmation),
            ) if errors.is_empty() => Ok(RegistrationOutcome::Valid(CleanedRegistration::new(
                first_name,
                last_name,
                username,
                email_phone,
                password,
                confirmation,
            ))),
            _ => Ok(RegistrationOutcome::Invalid(errors)),
        }
    }

    async fn check_username_unique(
        &self,
        username: String,
        errors: &mut FieldErrors,
    ) -> Result<Option<String>, DomainError> {
        if self.users.username_exists(&username).await? {
            errors.add(RegistrationField::Username, FieldError::duplicate_username());
            return Ok(None);
        }

        Ok(Some(username))
    }

    async fn check_email_phone_unique(
        &self,
        value: String,
        errors: &mut FieldErrors,
    ) -> Result<Option<String>, DomainError> {
        if self.users.email_exists(&value).await? {
            errors.add(RegistrationField::EmailPhone, FieldError::duplicate_email());
            return Ok(None);
        }

        if self.customers.phone_exists(&value).await? {
            errors.add(RegistrationField::EmailPhone, FieldError::duplicate_phone());
            return Ok(None);
        }

        Ok(Some(value))
    }

    fn check_password_policy(
        &self,
        password: String,
        attributes: &UserAttributes,
        errors: &mut FieldErrors,
    ) -> Option<String> {
        let violations = self.policy.validate(&password, attributes);

        if violations.is_empty() {
            return Some(password);
        }

        for violation in violations {
            errors.add(RegistrationField::Password, violation.into());
        }

        None
    }
}

/// Text fields are trimmed; passwords are taken verbatim
fn required(
    field: RegistrationField,
    payload: &RegistrationPayload,
    errors: &mut FieldErrors,
) -> Option<String> {
    let raw = payload.value(field);
    let value = match field {
        RegistrationField::Password | RegistrationField::PasswordConfirmation => raw,
        _ => raw.trim(),
    };

    if value.is_empty() {
        errors.add(field, FieldError::required());
        return None;
    }

    Some(value.to_string())
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn clean_name(
    field: RegistrationField,
    payload: &RegistrationPayload,
    errors: &mut FieldErrors,
) -> Option<String> {
    let name = required(field, payload, errors)?;

    match validate_name(&name) {
        Ok(()) => Some(name),
        Err(UserValidationError::NameTooShort(_)) => {
            errors.add(field, FieldError::min_length(MIN_NAME_LENGTH, char_count(&name)));
            None
        }
        Err(_) => {
            errors.add(field, FieldError::max_length(MAX_NAME_LENGTH, char_count(&name)));
            None
        }
    }
}

fn clean_username_format(
    payload: &RegistrationPayload,
    errors: &mut FieldErrors,
) -> Option<String> {
    let field = RegistrationField::Username;
    let username = required(field, payload, errors)?;

    let failures = match validate_username(&username) {
        Ok(()) => return Some(username),
        Err(failures) => failures,
    };

    for failure in failures {
        let error = match failure {
            UserValidationError::UsernameTooShort(_) => {
                FieldError::min_length(MIN_USERNAME_LENGTH, char_count(&username))
            }
            UserValidationError::UsernameTooLong(_) => {
                FieldError::max_length(MAX_USERNAME_LENGTH, char_count(&username))
            }
            _ => FieldError::invalid_username(),
        };
        errors.add(field, error);
    }

    None
}

fn clean_email_phone_format(
    payload: &RegistrationPayload,
    errors: &mut FieldErrors,
) -> Option<String> {
    let field = RegistrationField::EmailPhone;
    let value = required(field, payload, errors)?;
    let length = char_count(&value);

    if length as u64 > MAX_EMAIL_LENGTH {
        errors.add(field, FieldError::max_length(MAX_EMAIL_LENGTH, length));
        return None;
    }

    Some(value)
}

/// Exact comparison: no trimming, no case folding
fn check_confirmation(
    confirmation: String,
    password: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<String> {
    if password != Some(confirmation.as_str()) {
        errors.add(
            RegistrationField::PasswordConfirmation,
            FieldError::confirmation_mismatch(),
        );
        return None;
    }

    Some(confirmation)
}
