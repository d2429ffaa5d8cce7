//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 bearer token validation (and issuance for tooling and tests).

pub mod jwt;
