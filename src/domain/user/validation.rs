//! User field rules shared by sign-up and the user store

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Invalid user ID: '{0}'")]
    InvalidId(String),

    #[error("Invalid user status: '{0}'")]
    InvalidStatus(String),

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("{}", USERNAME_CHARSET_MESSAGE)]
    InvalidUsername,

    #[error("Name is too short. Minimum length is {0} characters")]
    NameTooShort(usize),

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

pub const MIN_NAME_LENGTH: u64 = 3;
pub const MAX_NAME_LENGTH: u64 = 50;
pub const MIN_USERNAME_LENGTH: u64 = 4;
pub const MAX_USERNAME_LENGTH: u64 = 150;
pub const MAX_EMAIL_LENGTH: u64 = 254;

pub const USERNAME_CHARSET_MESSAGE: &str =
    "Username may contain alphanumeric, _, @, +, . and - characters.";

/// ASCII word characters plus `.@+-`; `$` only matches at the very end
pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.@+\-]+$").expect("username pattern is valid")
});

/// Validate a username's length and character set
///
/// Rules:
/// - 4 to 150 characters
/// - Only ASCII letters, digits, `_`, `.`, `@`, `+` and `-`
///
/// Both rules are checked; a short username with a bad character reports
/// the length error followed by the charset error.
pub fn validate_username(username: &str) -> Result<(), Vec<UserValidationError>> {
    let length = username.chars().count() as u64;
    let mut errors = Vec::new();

    if length < MIN_USERNAME_LENGTH {
        errors.push(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH as usize));
    } else if length > MAX_USERNAME_LENGTH {
        errors.push(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH as usize));
    }

    if !USERNAME_REGEX.is_match(username) {
        errors.push(UserValidationError::InvalidUsername);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a first or last name: 3 to 50 characters
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    let length = name.chars().count() as u64;

    if length < MIN_NAME_LENGTH {
        return Err(UserValidationError::NameTooShort(MIN_NAME_LENGTH as usize));
    }

    if length > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH as usize));
    }

    Ok(())
}
