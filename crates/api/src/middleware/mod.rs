//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`project::ProjectAccess`] -- Loads the `{id}` project and checks the caller owns it.
//! - [`path::PathParams`] -- Typed path parameters that reject as JSON.

pub mod auth;
pub mod path;
pub mod project;
