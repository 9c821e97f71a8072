//! Account registration module
//!
//! Turns a validated sign-up into stored user and customer records.

mod service;

pub use service::{AccountService, RegisteredAccount, RegistrationResult};
