//! Authentication infrastructure module
//!
//! JWT issuance and validation for logged-in users.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
