//! Repository for the `event_reminders` table.

use chrono::NaiveDate;
use rats_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::event::EventReminder;

const COLUMNS: &str = "id, event_id, user_id, reminder_day, fire_date, dispatched_at";

pub struct EventReminderRepo;

impl EventReminderRepo {
    /// Record that a reminder fired.
    ///
    /// Returns `None` when the same reminder was already recorded, so callers
    /// can skip side effects for duplicates. Run it in the same transaction
    /// as those side effects so a failure leaves the reminder unrecorded.
    pub async fn record<'e>(
        executor: impl PgExecutor<'e>,
        event_id: DbId,
        user_id: DbId,
        reminder_day: i32,
        fire_date: NaiveDate,
    ) -> Result<Option<EventReminder>, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_reminders (event_id, user_id, reminder_day, fire_date)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_event_reminders_event_day_date DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventReminder>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(reminder_day)
            .bind(fire_date)
            .fetch_optional(executor)
            .await
    }

    /// All reminders already dispatched for an event.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<EventReminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_reminders WHERE event_id = $1 ORDER BY fire_date ASC"
        );
        sqlx::query_as::<_, EventReminder>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
