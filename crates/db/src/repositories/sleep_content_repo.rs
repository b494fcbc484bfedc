//! Repository for the `sleep_content` table.

use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::meditation::{CreateSleepContent, SleepContent, UpdateSleepContent};

const COLUMNS: &str = "id, title, description, kind, duration_secs, audio_url, created_at, updated_at";

pub struct SleepContentRepo;

impl SleepContentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSleepContent,
    ) -> Result<SleepContent, sqlx::Error> {
        let query = format!(
            "INSERT INTO sleep_content (title, description, kind, duration_secs, audio_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SleepContent>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.duration_secs)
            .bind(&input.audio_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SleepContent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sleep_content WHERE id = $1");
        sqlx::query_as::<_, SleepContent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, kind: Option<&str>) -> Result<Vec<SleepContent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sleep_content
             WHERE ($1::TEXT IS NULL OR kind = $1)
             ORDER BY title ASC"
        );
        sqlx::query_as::<_, SleepContent>(&query)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSleepContent,
    ) -> Result<Option<SleepContent>, sqlx::Error> {
        let query = format!(
            "UPDATE sleep_content SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                kind = COALESCE($4, kind),
                duration_secs = COALESCE($5, duration_secs),
                audio_url = COALESCE($6, audio_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SleepContent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.duration_secs)
            .bind(&input.audio_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sleep_content WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
