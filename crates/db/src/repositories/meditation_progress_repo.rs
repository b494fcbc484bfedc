//! Repository for the `meditation_progress` table.

use chrono::NaiveDate;
use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::meditation::{CreateMeditationProgress, DailyPracticeRow, MeditationProgress};

const COLUMNS: &str = "id, user_id, meditation_id, custom_meditation_id, duration_secs, completed_at";

/// Records completed sessions and aggregates them per day.
pub struct MeditationProgressRepo;

impl MeditationProgressRepo {
    /// Record a completed session. `completed_at` defaults to now.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateMeditationProgress,
    ) -> Result<MeditationProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO meditation_progress
                (user_id, meditation_id, custom_meditation_id, duration_secs, completed_at)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeditationProgress>(&query)
            .bind(user_id)
            .bind(input.meditation_id)
            .bind(input.custom_meditation_id)
            .bind(input.duration_secs)
            .bind(input.completed_at)
            .fetch_one(pool)
            .await
    }

    /// Most recent sessions first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<MeditationProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meditation_progress
             WHERE user_id = $1
             ORDER BY completed_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, MeditationProgress>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total seconds and session count per UTC day in `[from, to]`.
    pub async fn daily_practice(
        pool: &PgPool,
        user_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyPracticeRow>, sqlx::Error> {
        sqlx::query_as::<_, DailyPracticeRow>(
            "SELECT (completed_at AT TIME ZONE 'UTC')::DATE AS day,
                    SUM(duration_secs)::BIGINT AS total_secs,
                    COUNT(*) AS sessions
             FROM meditation_progress
             WHERE user_id = $1
               AND (completed_at AT TIME ZONE 'UTC')::DATE BETWEEN $2 AND $3
             GROUP BY day
             ORDER BY day ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Every distinct UTC day with at least one session, ascending.
    pub async fn practice_dates(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar::<_, NaiveDate>(
            "SELECT DISTINCT (completed_at AT TIME ZONE 'UTC')::DATE AS day
             FROM meditation_progress
             WHERE user_id = $1
             ORDER BY day ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
