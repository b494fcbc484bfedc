//! Domain core for the RATS wellness platform.
//!
//! Pure functions and constants with no database or HTTP dependencies:
//! nutrition math, reminder-day rules, streak aggregation, social post
//! composition, and token encryption.

pub mod crypto;
pub mod error;
pub mod hashing;
pub mod meditation;
pub mod nutrition;
pub mod reminders;
pub mod roles;
pub mod social;
pub mod streaks;
pub mod types;
