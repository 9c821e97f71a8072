//! PostgreSQL customer repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::customer::{Customer, CustomerId, CustomerRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of CustomerRepository
#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError> {
        let row = sqlx::query(
            "SELECT id, user_id, phone, created_at FROM customers WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get customer by phone: {}", e)))?;

        Ok(row.as_ref().map(row_to_customer))
    }

    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Customer>, DomainError> {
        let row = sqlx::query(
            "SELECT id, user_id, phone, created_at FROM customers WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get customer by user: {}", e)))?;

        Ok(row.as_ref().map(row_to_customer))
    }

    async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, user_id, phone, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(customer.id().as_uuid())
        .bind(customer.user_id().as_uuid())
        .bind(customer.phone())
        .bind(customer.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::conflict_on(
                "email_phone",
                format!("Phone '{}' already exists", customer.phone()),
            ),
            _ => DomainError::storage(format!("Failed to create customer: {}", e)),
        })?;

        Ok(customer)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count customers: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_customer(row: &sqlx::postgres::PgRow) -> Customer {
    let id: Uuid = row.get("id");
    let user_id: Uuid = row.get("user_id");

    Customer::from_parts(
        CustomerId::from(id),
        UserId::from(user_id),
        row.get("phone"),
        row.get("created_at"),
    )
}
