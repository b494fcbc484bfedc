//! Repository for the `meditations` table.

use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::meditation::{CreateMeditation, Meditation, UpdateMeditation};

const COLUMNS: &str = "id, course_id, position, title, description, category, duration_secs, \
                        audio_url, created_at, updated_at";

/// Standalone sessions, or sessions whose course is published.
const PUBLISHED_COURSE: &str = "(course_id IS NULL OR EXISTS (
    SELECT 1 FROM meditation_courses c WHERE c.id = meditations.course_id AND c.is_published))";

/// Provides CRUD operations for single meditation sessions.
pub struct MeditationRepo;

impl MeditationRepo {
    pub async fn create(pool: &PgPool, input: &CreateMeditation) -> Result<Meditation, sqlx::Error> {
        let query = format!(
            "INSERT INTO meditations (course_id, position, title, description, category, duration_secs, audio_url)
             VALUES ($1, COALESCE($2, 0), $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(input.course_id)
            .bind(input.position)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.duration_secs)
            .bind(&input.audio_url)
            .fetch_one(pool)
            .await
    }

    /// Find a session. Sessions of an unpublished course are hidden unless
    /// `include_unpublished` is set.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        include_unpublished: bool,
    ) -> Result<Option<Meditation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meditations
             WHERE id = $1 AND ($2 = true OR {PUBLISHED_COURSE})"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(id)
            .bind(include_unpublished)
            .fetch_optional(pool)
            .await
    }

    /// List meditations, optionally filtered by category. Sessions of an
    /// unpublished course are left out unless `include_unpublished` is set.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
        include_unpublished: bool,
    ) -> Result<Vec<Meditation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meditations
             WHERE ($1::TEXT IS NULL OR category = $1)
               AND ($2 = true OR {PUBLISHED_COURSE})
             ORDER BY title ASC"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(category)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await
    }

    /// Sessions belonging to a course, in course order.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<Meditation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meditations
             WHERE course_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMeditation,
    ) -> Result<Option<Meditation>, sqlx::Error> {
        let query = format!(
            "UPDATE meditations SET
                course_id = COALESCE($2, course_id),
                position = COALESCE($3, position),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                category = COALESCE($6, category),
                duration_secs = COALESCE($7, duration_secs),
                audio_url = COALESCE($8, audio_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(id)
            .bind(input.course_id)
            .bind(input.position)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.duration_secs)
            .bind(&input.audio_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meditations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
