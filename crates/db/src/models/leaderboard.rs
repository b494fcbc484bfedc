//! Leaderboard row model.

use serde::Serialize;
use sqlx::FromRow;

/// One ranked user. Only the display name identifies the user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub display_name: String,
    pub score: f64,
}
