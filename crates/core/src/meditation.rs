//! Meditation catalog constants and validation.

use crate::error::{validate_known_value, CoreError};

pub const LEVEL_BEGINNER: &str = "beginner";
pub const LEVEL_INTERMEDIATE: &str = "intermediate";
pub const LEVEL_ADVANCED: &str = "advanced";

pub const VALID_LEVELS: &[&str] = &[LEVEL_BEGINNER, LEVEL_INTERMEDIATE, LEVEL_ADVANCED];

pub const VALID_CATEGORIES: &[&str] = &[
    "mindfulness",
    "breathing",
    "body_scan",
    "sleep",
    "focus",
    "stress",
    "gratitude",
];

pub const VALID_SLEEP_KINDS: &[&str] = &["story", "music", "soundscape"];

/// Custom meditation length bounds, in minutes.
pub const MIN_CUSTOM_MINUTES: i32 = 1;
pub const MAX_CUSTOM_MINUTES: i32 = 60;

/// Recorded session length bounds, in seconds.
pub const MIN_SESSION_SECS: i32 = 1;
pub const MAX_SESSION_SECS: i32 = 4 * 60 * 60;

/// Default and maximum window for progress statistics, in days.
pub const DEFAULT_STATS_DAYS: i64 = 90;
pub const MAX_STATS_DAYS: i64 = 366;

pub fn validate_level(level: &str) -> Result<(), CoreError> {
    validate_known_value(level, VALID_LEVELS, "level")
}

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    validate_known_value(category, VALID_CATEGORIES, "category")
}

pub fn validate_sleep_kind(kind: &str) -> Result<(), CoreError> {
    validate_known_value(kind, VALID_SLEEP_KINDS, "kind")
}

/// Clamp a requested statistics window to `1..=MAX_STATS_DAYS`.
pub fn clamp_stats_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_STATS_DAYS).clamp(1, MAX_STATS_DAYS)
}

/// Convert a session length in seconds to fractional minutes.
pub fn secs_to_minutes(secs: i64) -> f64 {
    (secs as f64 / 60.0 * 10.0).round() / 10.0
}
