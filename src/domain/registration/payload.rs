//! Sign-up submission and its cleaned form

use serde::{Deserialize, Serialize};

use super::errors::RegistrationField;

/// Raw sign-up submission, exactly as posted
///
/// Missing fields deserialize as empty strings and are reported as
/// `required` by validation.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationPayload {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email_phone: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegistrationPayload {
    /// Raw value of a field
    pub fn value(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::FirstName => &self.first_name,
            RegistrationField::LastName => &self.last_name,
            RegistrationField::Username => &self.username,
            RegistrationField::EmailPhone => &self.email_phone,
            RegistrationField::Password => &self.password,
            RegistrationField::PasswordConfirmation => &self.password_confirmation,
        }
    }
}

impl std::fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email_phone", &self.email_phone)
            .field("password", &"[hidden]")
            .field("password_confirmation", &"[hidden]")
            .finish()
    }
}

/// How the account can be reached, derived from `email_phone`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Contact {
    Email(String),
    Phone(String),
}

impl Contact {
    /// Anything with an `@` is an e-mail address, everything else a phone
    pub fn classify(value: &str) -> Self {
        if value.contains('@') {
            Self::Email(value.to_string())
        } else {
            Self::Phone(value.to_string())
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Email(email) => Some(email),
            Self::Phone(_) => None,
        }
    }

    pub fn phone(&self) -> Option<&str> {
        match self {
            Self::Email(_) => None,
            Self::Phone(phone) => Some(phone),
        }
    }
}

/// A submission that passed every rule, ready for record creation
#[derive(Clone, PartialEq, Eq)]
pub struct CleanedRegistration {
    first_name: String,
    last_name: String,
    username: String,
    email_phone: String,
    password: String,
    password_confirmation: String,
}

impl CleanedRegistration {
    pub(super) fn new(
        first_name: String,
        last_name: String,
        username: String,
        email_phone: String,
        password: String,
        password_confirmation: String,
    ) -> Self {
        Self {
            first_name,
            last_name,
            username,
            email_phone,
            password,
            password_confirmation,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email_phone(&self) -> &str {
        &self.email_phone
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn password_confirmation(&self) -> &str {
        &self.password_confirmation
    }

    pub fn contact(&self) -> Contact {
        Contact::classify(&self.email_phone)
    }
}

impl std::fmt::Debug for CleanedRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanedRegistration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email_phone", &self.email_phone)
            .field("password", &"[hidden]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let payload: RegistrationPayload =
            serde_json::from_str(r#"{"username": "alice"}"#).unwrap();

        assert_eq!(payload.value(RegistrationField::Username), "alice");
        assert_eq!(payload.value(RegistrationField::EmailPhone), "");
        assert_eq!(payload.value(RegistrationField::PasswordConfirmation), "");
    }

    #[test]
    fn test_debug_hides_passwords() {
        let payload = RegistrationPayload {
            password: "Str0ng!Pass9".to_string(),
            password_confirmation: "Str0ng!Pass9".to_string(),
            ..Default::default()
        };

        let debug = format!("{:?}", payload);
        assert!(!debug.contains("Str0ng!Pass9"));
        assert!(debug.contains("[hidden]"));
    }

    #[test]
    fn test_contact_classification() {
        assert_eq!(Contact::classify("a@x.com"), Contact::Email("a@x.com".to_string()));
        assert_eq!(
            Contact::classify("09123456789"),
            Contact::Phone("09123456789".to_string())
        );
        assert_eq!(Contact::classify("a@x.com").phone(), None);
        assert_eq!(Contact::classify("09123456789").email(), None);
    }
}
