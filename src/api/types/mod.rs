//! API request and response types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ValidationFailure};
pub use json::Json;
