//! Repository for the `events` table.

use rats_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, location, starts_at, \
                        reminder_days, social, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (user_id, title, description, location, starts_at, reminder_days, social)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(&input.reminder_days)
            .bind(Json(&input.social))
            .fetch_one(pool)
            .await
    }

    /// Find an event by id, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's events ordered by start time.
    ///
    /// When `upcoming_only` is set, events that already started are skipped.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        upcoming_only: bool,
        limit: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE user_id = $1 AND ($2 = false OR starts_at >= NOW())
             ORDER BY starts_at ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(upcoming_only)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Events across all users starting in `[from, to)` that have at least
    /// one reminder day. Used by the reminder scheduler.
    pub async fn list_with_reminders_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE starts_at >= $1 AND starts_at < $2
               AND cardinality(reminder_days) > 0
             ORDER BY starts_at ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the event does not exist or belongs to another user.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                starts_at = COALESCE($6, starts_at),
                reminder_days = COALESCE($7, reminder_days),
                social = COALESCE($8, social)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(&input.reminder_days)
            .bind(input.social.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Replace the reminder-day list of an event.
    pub async fn set_reminder_days(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        days: &[i32],
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET reminder_days = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(user_id)
            .bind(days)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
