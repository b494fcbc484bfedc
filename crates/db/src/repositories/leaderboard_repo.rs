//! Ranked aggregates across users.

use chrono::NaiveDate;
use rats_core::error::CoreError;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::leaderboard::LeaderboardEntry;

/// What the leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    /// Minutes of completed meditation in the window.
    MeditationMinutes,
    /// Distinct days with at least one food log in the window.
    LoggingDays,
}

impl LeaderboardMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaderboardMetric::MeditationMinutes => "meditation_minutes",
            LeaderboardMetric::LoggingDays => "logging_days",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "meditation_minutes" => Ok(LeaderboardMetric::MeditationMinutes),
            "logging_days" => Ok(LeaderboardMetric::LoggingDays),
            other => Err(CoreError::Validation(format!(
                "Unknown leaderboard metric '{other}'. Must be one of: meditation_minutes, logging_days"
            ))),
        }
    }

    /// Per-user score subquery. `$1` is the first UTC date of the window.
    fn score_query(self) -> &'static str {
        match self {
            LeaderboardMetric::MeditationMinutes => {
                "SELECT user_id, SUM(duration_secs)::DOUBLE PRECISION / 60.0 AS score
                 FROM meditation_progress
                 WHERE (completed_at AT TIME ZONE 'UTC')::DATE >= $1
                 GROUP BY user_id"
            }
            LeaderboardMetric::LoggingDays => {
                "SELECT user_id, COUNT(DISTINCT log_date)::DOUBLE PRECISION AS score
                 FROM food_logs
                 WHERE log_date >= $1
                 GROUP BY user_id"
            }
        }
    }
}

pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// Top active users by `metric` from the UTC date `since` onwards.
    /// Ties share a rank.
    pub async fn top(
        pool: &PgPool,
        metric: LeaderboardMetric,
        since: NaiveDate,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        let query = format!(
            "SELECT RANK() OVER (ORDER BY s.score DESC) AS rank, u.display_name, s.score
             FROM ({}) s
             JOIN users u ON u.id = s.user_id
             WHERE u.is_active = true AND s.score > 0
             ORDER BY s.score DESC, u.id ASC
             LIMIT $2",
            metric.score_query()
        );
        sqlx::query_as::<_, LeaderboardEntry>(&query)
            .bind(since)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parsing() {
        assert_eq!(
            LeaderboardMetric::parse("logging_days").unwrap(),
            LeaderboardMetric::LoggingDays
        );
        assert_eq!(
            LeaderboardMetric::parse(LeaderboardMetric::MeditationMinutes.as_str()).unwrap(),
            LeaderboardMetric::MeditationMinutes
        );
        assert!(LeaderboardMetric::parse("steps").is_err());
    }
}
