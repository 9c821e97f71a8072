//! Customer repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Customer;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for customer storage
///
/// Phone lookups are exact. As with users, `Ok(None)` is "no such customer"
/// and `Err` is a failed lookup.
#[async_trait]
pub trait CustomerRepository: Send + Sync + Debug {
    /// Get a customer by exact phone number
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError>;

    /// Get the customer attached to a user
    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Customer>, DomainError>;

    /// Create a customer; a phone collision is a `Conflict`
    async fn create(&self, customer: Customer) -> Result<Customer, DomainError>;

    /// Count stored customers
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if a phone number is taken
    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_phone(phone).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock customer repository for testing
    #[derive(Debug, Default)]
    pub struct MockCustomerRepository {
        customers: Arc<RwLock<Vec<Customer>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockCustomerRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CustomerRepository for MockCustomerRepository {
        async fn get_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError> {
            self.check_should_fail().await?;
            let customers = self.customers.read().await;
            Ok(customers.iter().find(|c| c.phone() == phone).cloned())
        }

        async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Customer>, DomainError> {
            self.check_should_fail().await?;
            let customers = self.customers.read().await;
            Ok(customers.iter().find(|c| c.user_id() == user_id).cloned())
        }

        async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
            self.check_should_fail().await?;
            let mut customers = self.customers.write().await;

            if customers.iter().any(|c| c.phone() == customer.phone()) {
                return Err(DomainError::conflict_on(
                    "email_phone",
                    format!("Phone '{}' already exists", customer.phone()),
                ));
            }

            customers.push(customer.clone());
            Ok(customer)
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            Ok(self.customers.read().await.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_phone_lookup_is_exact() {
            let repo = MockCustomerRepository::new();
            repo.create(Customer::new(UserId::generate(), "09123456789"))
                .await
                .unwrap();

            assert!(repo.phone_exists("09123456789").await.unwrap());
            assert!(!repo.phone_exists("9123456789").await.unwrap());
            assert!(!repo.phone_exists("09123456789 ").await.unwrap());
        }

        #[tokio::test]
        async fn test_failure_is_not_absence() {
            let repo = MockCustomerRepository::new();
            repo.set_should_fail(true).await;

            assert!(repo.phone_exists("09123456789").await.is_err());
            assert!(repo.count().await.is_err());
        }
    }
}
