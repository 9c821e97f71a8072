//! Customer entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(Uuid);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for CustomerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer profile linked to a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    user_id: UserId,
    /// Mobile number, unique across customers
    phone: String,
    created_at: DateTime<Utc>,
}

impl Customer {
    /// Create a customer for a freshly registered user
    pub fn new(user_id: UserId, phone: impl Into<String>) -> Self {
        Self {
            id: CustomerId::generate(),
            user_id,
            phone: phone.into(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a customer from stored columns
    pub fn from_parts(
        id: CustomerId,
        user_id: UserId,
        phone: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            phone,
            created_at,
        }
    }

    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_creation() {
        let user_id = UserId::generate();
        let customer = Customer::new(user_id, "09123456789");

        assert_eq!(customer.user_id(), &user_id);
        assert_eq!(customer.phone(), "09123456789");
    }

    #[test]
    fn test_customer_ids_are_unique() {
        let user_id = UserId::generate();
        let a = Customer::new(user_id, "09123456789");
        let b = Customer::new(user_id, "09123456780");

        assert_ne!(a.id(), b.id());
    }
}
