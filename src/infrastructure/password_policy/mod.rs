//! Default password strength policy
//!
//! Four independent rules, reported in this order: minimum length, similarity
//! to the user's attributes, membership in a list of common passwords, and
//! being entirely numeric.

mod similarity;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::password_policy::{
    PasswordPolicy, PasswordRule, PasswordViolation, UserAttributes,
};

pub use similarity::similarity_ratio;

pub const DEFAULT_MIN_LENGTH: usize = 8;
pub const DEFAULT_MAX_SIMILARITY: f64 = 0.7;

/// Built-in list; deployments can swap in a fuller one with
/// [`DefaultPasswordPolicy::with_common_passwords`]
static EMBEDDED_COMMON_PASSWORDS: Lazy<Arc<HashSet<String>>> =
    Lazy::new(|| Arc::new(parse_common_passwords(include_str!("common_passwords.txt"))));

/// One password per line; blank lines are skipped and entries lowercased
pub fn parse_common_passwords(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Read a newline-separated common password list from disk
pub fn load_common_passwords(path: impl AsRef<Path>) -> std::io::Result<HashSet<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_common_passwords(&text))
}

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("separator pattern is valid"));

/// Standard four-rule policy
#[derive(Debug, Clone)]
pub struct DefaultPasswordPolicy {
    min_length: usize,
    max_similarity: f64,
    common_passwords: Arc<HashSet<String>>,
}

impl Default for DefaultPasswordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH, DEFAULT_MAX_SIMILARITY)
    }
}

impl DefaultPasswordPolicy {
    /// `max_similarity` is clamped to at least 0.1
    pub fn new(min_length: usize, max_similarity: f64) -> Self {
        Self {
            min_length,
            max_similarity: max_similarity.max(0.1),
            common_passwords: EMBEDDED_COMMON_PASSWORDS.clone(),
        }
    }

    /// Replace the embedded common password list
    pub fn with_common_passwords(mut self, passwords: HashSet<String>) -> Self {
        self.common_passwords = Arc::new(passwords);
        self
    }

    fn check_length(&self, password: &str) -> Option<PasswordViolation> {
        if password.chars().count() >= self.min_length {
            return None;
        }

        let unit = if self.min_length == 1 { "character" } else { "characters" };
        Some(PasswordViolation::new(
            PasswordRule::TooShort,
            format!(
                "This password is too short. It must contain at least {} {}.",
                self.min_length, unit
            ),
        ))
    }

    /// Reports the first attribute the password resembles
    fn check_similarity(
        &self,
        password: &str,
        attributes: &UserAttributes,
    ) -> Option<PasswordViolation> {
        let password = password.to_lowercase();

        for (name, value) in attributes.named() {
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                continue;
            };

            let value = value.to_lowercase();
            let parts = NON_WORD
                .split(&value)
                .chain(std::iter::once(value.as_str()));

            for part in parts {
                if self.exceeds_length_ratio(&password, part) {
                    continue;
                }

                if similarity_ratio(&password, part) >= self.max_similarity {
                    debug!(attribute = name, "Password resembles a user attribute");
                    return Some(PasswordViolation::new(
                        PasswordRule::TooSimilar,
                        format!("The password is too similar to the {}.", name),
                    ));
                }
            }
        }

        None
    }

    /// A short value inside a much longer password cannot reach the threshold
    fn exceeds_length_ratio(&self, password: &str, value: &str) -> bool {
        let password_len = password.chars().count();
        let value_len = value.chars().count();
        let bound = self.max_similarity / 2.0 * password_len as f64;

        password_len >= 10 * value_len && (value_len as f64) < bound
    }

    fn check_common(&self, password: &str) -> Option<PasswordViolation> {
        let normalized = password.trim().to_lowercase();

        self.common_passwords.contains(&normalized).then(|| {
            PasswordViolation::new(PasswordRule::TooCommon, "This password is too common.")
        })
    }

    fn check_numeric(&self, password: &str) -> Option<PasswordViolation> {
        let numeric = !password.is_empty() && password.chars().all(|c| c.is_ascii_digit());

        numeric.then(|| {
            PasswordViolation::new(
                PasswordRule::EntirelyNumeric,
                "This password is entirely numeric.",
            )
        })
    }
}

impl PasswordPolicy for DefaultPasswordPolicy {
    fn validate(&self, password: &str, attributes: &UserAttributes) -> Vec<PasswordViolation> {
        [
            self.check_length(password),
            self.check_similarity(password, attributes),
            self.check_common(password),
            self.check_numeric(password),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
