//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository, UserStatus};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// lowercased username -> user ID
    username_index: HashMap<String, UserId>,
    /// lowercased e-mail -> user ID
    email_index: HashMap<String, UserId>,
}

impl Tables {
    fn insert(&mut self, user: User) {
        let id = *user.id();
        self.username_index.insert(user.username().to_lowercase(), id);
        if let Some(email) = user.email() {
            self.email_index.insert(email.to_lowercase(), id);
        }
        self.users.insert(id, user);
    }

    fn remove_indexes(&mut self, user: &User) {
        self.username_index.remove(&user.username().to_lowercase());
        if let Some(email) = user.email() {
            self.email_index.remove(&email.to_lowercase());
        }
    }

    fn check_unique(&self, user: &User) -> Result<(), DomainError> {
        if self.username_index.contains_key(&user.username().to_lowercase()) {
            return Err(DomainError::conflict_on(
                "username",
                format!("Username '{}' already exists", user.username()),
            ));
        }

        if let Some(email) = user.email() {
            if self.email_index.contains_key(&email.to_lowercase()) {
                return Err(DomainError::conflict_on(
                    "email_phone",
                    format!("Email '{}' already exists", email),
                ));
            }
        }

        Ok(())
    }
}

/// In-memory implementation of UserRepository
///
/// All tables sit behind one lock so that the uniqueness check and the
/// insert happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut tables = Tables::default();

        for user in users {
            tables.insert(user);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .username_index
            .get(&username.to_lowercase())
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(&email.to_lowercase())
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        tables.check_unique(&user)?;
        tables.insert(user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        match tables.users.remove(id) {
            Some(user) => {
                tables.remove_indexes(&user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, status: Option<UserStatus>) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;

        let count = match status {
            Some(s) => tables.users.values().filter(|u| u.status() == s).count(),
            None => tables.users.len(),
        };

        Ok(count)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;

        match tables.users.get_mut(id) {
            Some(user) => {
                user.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;

    fn create_test_user(username: &str, email: Option<&str>) -> User {
        User::new(NewUser {
            username: username.to_string(),
            email: email.map(String::from),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password_hash: "hashed_password".to_string(),
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", Some("a@x.com"));

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.username(), "alice");
        assert_eq!(retrieved.email(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_lookups_ignore_case() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_test_user("Alice", Some("Ann@Example.com")))
            .await
            .unwrap();

        assert!(repo.get_by_username("aLiCe").await.unwrap().is_some());
        assert!(repo.get_by_email("ann@example.COM").await.unwrap().is_some());
        assert!(repo.get_by_username("bob_").await.unwrap().is_none());
        assert!(repo.get_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_username_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_test_user("alice", None)).await.unwrap();

        let result = repo.create(create_test_user("ALICE", None)).await;

        assert!(matches!(
            result,
            Err(DomainError::Conflict { field: Some("username"), .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_an_email_phone_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.create(create_test_user("alice", Some("a@x.com")))
            .await
            .unwrap();

        let result = repo.create(create_test_user("alicia", Some("A@X.COM"))).await;

        assert!(matches!(
            result,
            Err(DomainError::Conflict { field: Some("email_phone"), .. })
        ));
    }

    #[tokio::test]
    async fn test_users_without_email_do_not_collide() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("alice", None)).await.unwrap();
        repo.create(create_test_user("bobby", None)).await.unwrap();

        assert_eq!(repo.count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_frees_username_and_email() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", Some("a@x.com"));
        repo.create(user.clone()).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(!repo.delete(user.id()).await.unwrap());

        assert!(!repo.username_exists("alice").await.unwrap());
        assert!(!repo.email_exists("a@x.com").await.unwrap());
        repo.create(create_test_user("alice", Some("a@x.com")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let active = create_test_user("alice", None);
        let suspended = User::from_parts(
            UserId::generate(),
            "bobby".to_string(),
            None,
            "Bo".to_string(),
            "By".to_string(),
            "hashed_password".to_string(),
            UserStatus::Suspended,
            active.created_at(),
            active.updated_at(),
            None,
        );
        let repo = InMemoryUserRepository::with_users(vec![active, suspended]);

        assert_eq!(repo.count(Some(UserStatus::Suspended)).await.unwrap(), 1);
        assert_eq!(repo.count(Some(UserStatus::Active)).await.unwrap(), 1);
        assert_eq!(repo.count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_with_users_and_record_login() {
        let user = create_test_user("alice", None);
        let repo = InMemoryUserRepository::with_users(vec![user.clone()]);

        repo.record_login(user.id()).await.unwrap();

        let retrieved = repo.get_by_username("alice").await.unwrap().unwrap();
        assert!(retrieved.last_login_at().is_some());
    }
}
