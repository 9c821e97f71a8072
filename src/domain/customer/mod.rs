//! Customer domain
//!
//! A customer is the shop-side profile attached to a user. Customers that
//! signed up with a phone number carry it here; phone numbers are unique
//! and compared exactly.

mod entity;
mod repository;

pub use entity::{Customer, CustomerId};
pub use repository::CustomerRepository;

#[cfg(test)]
pub use repository::mock::MockCustomerRepository;
