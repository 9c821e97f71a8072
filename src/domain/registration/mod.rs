//! Sign-up registration
//!
//! Validates a sign-up submission against the user and customer stores and
//! reports failures per field.

mod errors;
mod payload;
mod validator;

pub use errors::{ErrorCode, FieldError, FieldErrors, RegistrationField};
pub use payload::{CleanedRegistration, Contact, RegistrationPayload};
pub use validator::{RegistrationOutcome, RegistrationValidator};
