//! Customer infrastructure module
//!
//! In-memory and PostgreSQL customer stores.

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresCustomerRepository;
pub use repository::InMemoryCustomerRepository;
