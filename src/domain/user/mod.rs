//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including user entities, field rules, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId, UserStatus};
pub use repository::UserRepository;
pub use validation::{
    validate_name, validate_username, UserValidationError, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH,
    MAX_USERNAME_LENGTH, MIN_NAME_LENGTH, MIN_USERNAME_LENGTH, USERNAME_CHARSET_MESSAGE,
    USERNAME_REGEX,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
