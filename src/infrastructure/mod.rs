//! Infrastructure layer - Store, hashing, token and policy implementations

pub mod account;
pub mod auth;
pub mod customer;
pub mod logging;
pub mod password_policy;
pub mod user;
