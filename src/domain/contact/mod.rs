//! Contact forms
//!
//! The e-mail and phone forms produce the value that later fills the
//! read-only `email_phone` field of the sign-up form. They check format
//! only; uniqueness is left to registration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::domain::registration::FieldError;
use crate::domain::user::MAX_EMAIL_LENGTH;

/// `09` followed by nine ASCII digits
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^09[0-9]{9}$").expect("phone pattern is valid"));

/// E-mail address form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EmailAddressForm {
    #[validate(length(max = MAX_EMAIL_LENGTH), email)]
    pub email: String,
}

impl EmailAddressForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Validate and return the address with its domain lowercased
    pub fn clean(&self) -> Result<String, Vec<FieldError>> {
        let form = Self::new(self.email.trim());

        if form.email.is_empty() {
            return Err(vec![FieldError::required()]);
        }

        form.validate()
            .map_err(|errors| collect_errors(&errors, "email", &form.email))?;

        Ok(normalize_email(&form.email))
    }
}

/// Phone number form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PhoneNumberForm {
    #[validate(regex(path = *PHONE_REGEX))]
    pub phone: String,
}

impl PhoneNumberForm {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }

    /// Validate and return the trimmed phone number
    pub fn clean(&self) -> Result<String, Vec<FieldError>> {
        let form = Self::new(self.phone.trim());

        if form.phone.is_empty() {
            return Err(vec![FieldError::required()]);
        }

        form.validate()
            .map_err(|errors| collect_errors(&errors, "phone", &form.phone))?;

        Ok(form.phone)
    }
}

/// Lowercase the part after the last `@`
fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn collect_errors(errors: &ValidationErrors, field: &str, value: &str) -> Vec<FieldError> {
    let field_errors = errors.field_errors();
    let Some(failures) = field_errors.get(field) else {
        return Vec::new();
    };

    failures
        .iter()
        .map(|failure| match failure.code.as_ref() {
            "length" => FieldError::max_length(MAX_EMAIL_LENGTH, value.chars().count()),
            "email" => FieldError::invalid_email(),
            _ => FieldError::invalid_phone(),
        })
        .collect()
}
