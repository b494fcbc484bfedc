//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and strength rules.
//! - [`jwt`] -- access-token issue/validation and refresh-token helpers.
//! - [`oauth_state`] -- signed `state` values for social OAuth round trips.

pub mod jwt;
pub mod oauth_state;
pub mod password;
