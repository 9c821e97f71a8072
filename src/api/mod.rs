//! API layer - HTTP endpoints and middleware

pub mod account;
pub mod auth;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::RequireUser;
pub use router::{create_router, create_router_with_state};
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::config::AppConfig;
    use crate::domain::customer::{Customer, CustomerRepository, MockCustomerRepository};
    use crate::domain::user::{MockUserRepository, NewUser, User, UserRepository};
    use crate::infrastructure::customer::InMemoryCustomerRepository;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, PasswordHasher};

    use super::AppState;

    pub const TEST_PASSWORD: &str = "Str0ng!Pass9";

    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("router-test-secret".to_string());
        config
    }

    /// In-memory stores holding `alice` (a@x.com) and `bob_phone` (09123456789)
    pub async fn seeded_state() -> AppState {
        let hash = Argon2Hasher::new().hash(TEST_PASSWORD).unwrap();
        let user = |username: &str, email: Option<&str>| {
            User::new(NewUser {
                username: username.to_string(),
                email: email.map(String::from),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                password_hash: hash.clone(),
            })
        };

        let alice = user("alice", Some("a@x.com"));
        let bob = user("bob_phone", None);

        let customers = InMemoryCustomerRepository::new();
        customers
            .create(Customer::new(*bob.id(), "09123456789"))
            .await
            .unwrap();

        crate::build_app_state(
            Arc::new(InMemoryUserRepository::with_users(vec![alice, bob])),
            Arc::new(customers),
            &test_config(),
        )
        .unwrap()
    }

    /// Stores whose every call fails
    pub async fn broken_state() -> AppState {
        let users = MockUserRepository::new();
        users.set_should_fail(true).await;
        let customers = MockCustomerRepository::new();
        customers.set_should_fail(true).await;

        let users: Arc<dyn UserRepository> = Arc::new(users);
        let customers: Arc<dyn CustomerRepository> = Arc::new(customers);

        crate::build_app_state(users, customers, &test_config()).unwrap()
    }
}
