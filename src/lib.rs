//! Account Gateway
//!
//! Sign-up and login service:
//! - Registration validation with case-insensitive uniqueness checks
//! - Configurable password policy
//! - E-mail and phone contact forms
//! - Login with JWT issuance and form presentation metadata

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::StorageBackend;
use domain::{CustomerRepository, PasswordPolicy, UserRepository};
use infrastructure::{
    account::AccountService,
    auth::{JwtConfig, JwtGenerator, JwtService},
    customer::{InMemoryCustomerRepository, PostgresCustomerRepository},
    password_policy::{load_common_passwords, DefaultPasswordPolicy},
    user::{Argon2Hasher, InMemoryUserRepository, PasswordHasher, PostgresUserRepository, UserService},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Storage backend: {:?}", config.storage.backend);

    let (users, customers): (Arc<dyn UserRepository>, Arc<dyn CustomerRepository>) =
        match config.storage.backend {
            StorageBackend::Memory => (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryCustomerRepository::new()),
            ),
            StorageBackend::Postgres => {
                let pool = connect_postgres(config).await?;
                (
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    Arc::new(PostgresCustomerRepository::new(pool)),
                )
            }
        };

    build_app_state(users, customers, config)
}

/// Wire services on top of the given stores
pub fn build_app_state(
    users: Arc<dyn UserRepository>,
    customers: Arc<dyn CustomerRepository>,
    config: &AppConfig,
) -> anyhow::Result<AppState> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let policy: Arc<dyn PasswordPolicy> = Arc::new(create_password_policy(config)?);

    let user_service = Arc::new(UserService::new(users.clone(), hasher.clone()));
    let account_service = Arc::new(AccountService::new(users, customers, policy, hasher));
    let jwt_service = create_jwt_service(config);

    Ok(AppState::new(user_service, account_service, jwt_service))
}

fn create_password_policy(config: &AppConfig) -> anyhow::Result<DefaultPasswordPolicy> {
    let settings = &config.password_policy;
    let policy = DefaultPasswordPolicy::new(settings.min_length, settings.max_similarity);

    let Some(path) = &settings.common_passwords_file else {
        return Ok(policy);
    };

    let passwords = load_common_passwords(path).map_err(|e| {
        anyhow::anyhow!("Failed to read common password list {}: {}", path.display(), e)
    })?;
    info!(entries = passwords.len(), "Loaded common password list");

    Ok(policy.with_common_passwords(passwords))
}

async fn connect_postgres(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let database_url = config
        .storage
        .database_url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("storage.database_url or DATABASE_URL is required for postgres")
        })?;

    info!("Connecting to PostgreSQL...");
    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
    info!("PostgreSQL connection established");

    if config.storage.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(pool)
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create JWT service from secret (config, env var, or random)
fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Sessions will NOT persist across restarts."
            );
            generate_random_secret()
        });

    Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        u64::from(config.auth.jwt_expiration_hours),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret_shape() {
        let secret = generate_random_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_random_secret());
    }

    #[tokio::test]
    async fn test_memory_backend_state() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("test-secret".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();

        assert_eq!(state.user_service.count(None).await.unwrap(), 0);
        assert_eq!(state.jwt_service.expiration_hours(), 24);
    }

    #[tokio::test]
    async fn test_missing_common_password_file_fails_startup() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("test-secret".to_string());
        config.password_policy.common_passwords_file =
            Some(std::env::temp_dir().join("no-such-common-passwords.txt"));

        let err = create_app_state_with_config(&config).await.err().unwrap();
        assert!(err.to_string().contains("common password list"));
    }
}
