//! Domain layer - Core business logic and entities

pub mod contact;
pub mod customer;
pub mod error;
pub mod password_policy;
pub mod presentation;
pub mod registration;
pub mod user;

pub use contact::{EmailAddressForm, PhoneNumberForm};
pub use customer::{Customer, CustomerId, CustomerRepository};
pub use error::DomainError;
pub use password_policy::{PasswordPolicy, PasswordRule, PasswordViolation, UserAttributes};
pub use presentation::{FieldPresentation, FormPresentation, InputType};
pub use registration::{
    CleanedRegistration, Contact, ErrorCode, FieldError, FieldErrors, RegistrationField,
    RegistrationOutcome, RegistrationPayload, RegistrationValidator,
};
pub use user::{NewUser, User, UserId, UserRepository, UserStatus, UserValidationError};
