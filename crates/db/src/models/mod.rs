//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod event;
pub mod food_log;
pub mod leaderboard;
pub mod meditation;
pub mod nutrition_profile;
pub mod role;
pub mod session;
pub mod social;
pub mod user;
