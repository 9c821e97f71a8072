//! Password strength policy
//!
//! The policy decides whether a candidate password is acceptable for a given
//! account. It receives whatever user attributes are already known so that it
//! can reject passwords that resemble them.

use std::fmt::Debug;

/// User attributes a password must not resemble
///
/// Any attribute may be missing, for instance when the username itself
/// failed validation in the same pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserAttributes {
    /// Attributes in checking order, paired with their display name
    pub fn named(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("username", self.username.as_deref()),
            ("email address", self.email.as_deref()),
        ]
    }
}

/// Rule that rejected a password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort,
    TooSimilar,
    TooCommon,
    EntirelyNumeric,
}

/// A single policy violation with its user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordViolation {
    pub rule: PasswordRule,
    pub message: String,
}

impl PasswordViolation {
    pub fn new(rule: PasswordRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Password strength evaluator
///
/// Returns every violated rule; an empty list means the password is accepted.
pub trait PasswordPolicy: Send + Sync + Debug {
    fn validate(&self, password: &str, attributes: &UserAttributes) -> Vec<PasswordViolation>;
}
