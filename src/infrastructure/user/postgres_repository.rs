//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserRepository, UserStatus};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, status, \
                            created_at, updated_at, last_login_at";

/// Unique index names from `migrations/0001_accounts.sql`
pub(crate) const USERNAME_INDEX: &str = "users_username_lower_key";
pub(crate) const EMAIL_INDEX: &str = "users_email_lower_key";

/// PostgreSQL implementation of UserRepository
///
/// Case-insensitive lookups go through `lower()` so that they hit the
/// functional unique indexes.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: &str,
        what: &str,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE {condition}"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by {}: {}", what, e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("lower(username) = lower($1)", username, "username")
            .await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("lower(email) = lower($1)", email, "email")
            .await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash,
                               status, created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.email())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.password_hash())
        .bind(user.status().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user, "create"))?;

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        let count: i64 = match status {
            Some(s) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = $1")
                    .bind(s.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }
}

/// Turn a unique violation into a field-attributed conflict
fn map_write_error(error: sqlx::Error, user: &User, action: &str) -> DomainError {
    let constraint = match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => db.constraint().map(String::from),
        _ => return DomainError::storage(format!("Failed to {} user: {}", action, error)),
    };

    match constraint.as_deref() {
        Some(USERNAME_INDEX) => DomainError::conflict_on(
            "username",
            format!("Username '{}' already exists", user.username()),
        ),
        Some(EMAIL_INDEX) => DomainError::conflict_on(
            "email_phone",
            format!("Email '{}' already exists", user.email().unwrap_or_default()),
        ),
        _ => DomainError::conflict(format!("User '{}' already exists", user.id())),
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.get("id");
    let status: String = row.get("status");

    let status = status
        .parse::<UserStatus>()
        .map_err(|e| DomainError::storage(format!("Invalid user row: {}", e)))?;

    Ok(User::from_parts(
        UserId::from(id),
        row.get("username"),
        row.get("email"),
        row.get("first_name"),
        row.get("last_name"),
        row.get("password_hash"),
        status,
        row.get("created_at"),
        row.get("updated_at"),
        row.get("last_login_at"),
    ))
}
