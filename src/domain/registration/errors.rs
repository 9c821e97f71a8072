//! Field-keyed validation failures

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::password_policy::{PasswordRule, PasswordViolation};
use crate::domain::user::USERNAME_CHARSET_MESSAGE;

/// Sign-up form fields, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationField {
    FirstName,
    LastName,
    Username,
    EmailPhone,
    Password,
    PasswordConfirmation,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Username,
        Self::EmailPhone,
        Self::Password,
        Self::PasswordConfirmation,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::EmailPhone => "email_phone",
            Self::Password => "password",
            Self::PasswordConfirmation => "password_confirmation",
        }
    }
}

impl std::fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason for a field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    MinLength,
    MaxLength,
    InvalidUsername,
    DuplicateUsername,
    DuplicateEmail,
    DuplicatePhone,
    PasswordTooShort,
    PasswordTooSimilar,
    PasswordTooCommon,
    PasswordEntirelyNumeric,
    PasswordConfirmationMismatch,
    InvalidEmail,
    InvalidPhone,
}

impl From<PasswordRule> for ErrorCode {
    fn from(rule: PasswordRule) -> Self {
        match rule {
            PasswordRule::TooShort => Self::PasswordTooShort,
            PasswordRule::TooSimilar => Self::PasswordTooSimilar,
            PasswordRule::TooCommon => Self::PasswordTooCommon,
            PasswordRule::EntirelyNumeric => Self::PasswordEntirelyNumeric,
        }
    }
}

/// One failure on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn required() -> Self {
        Self::new(ErrorCode::Required, "This field is required.")
    }

    pub fn min_length(limit: u64, actual: usize) -> Self {
        Self::new(
            ErrorCode::MinLength,
            format!(
                "Ensure this value has at least {} characters (it has {}).",
                limit, actual
            ),
        )
    }

    pub fn max_length(limit: u64, actual: usize) -> Self {
        Self::new(
            ErrorCode::MaxLength,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                limit, actual
            ),
        )
    }

    pub fn invalid_username() -> Self {
        Self::new(ErrorCode::InvalidUsername, USERNAME_CHARSET_MESSAGE)
    }

    pub fn duplicate_username() -> Self {
        Self::new(
            ErrorCode::DuplicateUsername,
            "The username has been registered before.",
        )
    }

    pub fn duplicate_email() -> Self {
        Self::new(
            ErrorCode::DuplicateEmail,
            "The email address has been registered before.",
        )
    }

    pub fn duplicate_phone() -> Self {
        Self::new(
            ErrorCode::DuplicatePhone,
            "The phone number has been registered before.",
        )
    }

    pub fn confirmation_mismatch() -> Self {
        Self::new(
            ErrorCode::PasswordConfirmationMismatch,
            "Password confirmation is not correct.",
        )
    }

    pub fn invalid_email() -> Self {
        Self::new(ErrorCode::InvalidEmail, "Enter a valid email address.")
    }

    pub fn invalid_phone() -> Self {
        Self::new(ErrorCode::InvalidPhone, "Enter a valid value.")
    }
}

impl From<PasswordViolation> for FieldError {
    fn from(violation: PasswordViolation) -> Self {
        Self::new(violation.rule.into(), violation.message)
    }
}

/// Failures of a validation pass, grouped by field in form order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<RegistrationField, Vec<FieldError>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: RegistrationField, error: FieldError) {
        self.0.entry(field).or_default().push(error);
    }

    pub fn get(&self, field: RegistrationField) -> &[FieldError] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: RegistrationField) -> bool {
        self.0.contains_key(&field)
    }

    /// Fields that failed, in form order
    pub fn fields(&self) -> Vec<RegistrationField> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegistrationField, &Vec<FieldError>)> {
        self.0.iter()
    }
}

impl From<(RegistrationField, FieldError)> for FieldErrors {
    fn from((field, error): (RegistrationField, FieldError)) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }
}
