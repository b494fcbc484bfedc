//! Repository for the `custom_meditations` table.

use rats_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::meditation::{CreateCustomMeditation, CustomMeditation};

const COLUMNS: &str = "id, user_id, title, intention, mood, duration_mins, script, steps, \
                        breathing_pattern, created_at";

/// Stores AI-generated meditations per user.
pub struct CustomMeditationRepo;

impl CustomMeditationRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCustomMeditation,
    ) -> Result<CustomMeditation, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_meditations
                (user_id, title, intention, mood, duration_mins, script, steps, breathing_pattern)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomMeditation>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.intention)
            .bind(&input.mood)
            .bind(input.duration_mins)
            .bind(&input.script)
            .bind(Json(&input.steps))
            .bind(&input.breathing_pattern)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<CustomMeditation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM custom_meditations WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, CustomMeditation>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<CustomMeditation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM custom_meditations
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, CustomMeditation>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_meditations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
