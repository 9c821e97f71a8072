//! In-memory customer repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::customer::{Customer, CustomerRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of CustomerRepository, keyed by phone
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().await;
        Ok(customers.get(phone).cloned())
    }

    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|c| c.user_id() == user_id).cloned())
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        let mut customers = self.customers.write().await;

        if customers.contains_key(customer.phone()) {
            return Err(DomainError::conflict_on(
                "email_phone",
                format!("Phone '{}' already exists", customer.phone()),
            ));
        }

        customers.insert(customer.phone().to_string(), customer.clone());
        Ok(customer)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.customers.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = InMemoryCustomerRepository::new();
        let user_id = UserId::generate();

        repo.create(Customer::new(user_id, "09123456789")).await.unwrap();

        let by_phone = repo.get_by_phone("09123456789").await.unwrap().unwrap();
        assert_eq!(by_phone.user_id(), &user_id);

        let by_user = repo.get_by_user(&user_id).await.unwrap().unwrap();
        assert_eq!(by_user.phone(), "09123456789");
    }

    #[tokio::test]
    async fn test_phone_match_is_exact() {
        let repo = InMemoryCustomerRepository::new();
        repo.create(Customer::new(UserId::generate(), "09123456789"))
            .await
            .unwrap();

        assert!(!repo.phone_exists("+989123456789").await.unwrap());
        assert!(!repo.phone_exists(" 09123456789").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_phone_conflict() {
        let repo = InMemoryCustomerRepository::new();
        repo.create(Customer::new(UserId::generate(), "09123456789"))
            .await
            .unwrap();

        let result = repo
            .create(Customer::new(UserId::generate(), "09123456789"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Conflict { field: Some("email_phone"), .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
