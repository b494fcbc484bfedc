//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a Bearer JWT.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
