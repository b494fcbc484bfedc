//! Repository for the `meditation_courses` table.

use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::meditation::{
    CreateMeditationCourse, MeditationCourse, UpdateMeditationCourse,
};

const COLUMNS: &str = "id, title, description, level, cover_image_url, is_published, \
                        created_at, updated_at";

/// Provides CRUD operations for meditation courses.
pub struct MeditationCourseRepo;

impl MeditationCourseRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateMeditationCourse,
    ) -> Result<MeditationCourse, sqlx::Error> {
        let query = format!(
            "INSERT INTO meditation_courses (title, description, level, cover_image_url, is_published)
             VALUES ($1, $2, COALESCE($3, 'beginner'), $4, COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeditationCourse>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.level)
            .bind(&input.cover_image_url)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MeditationCourse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meditation_courses WHERE id = $1");
        sqlx::query_as::<_, MeditationCourse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List courses, newest first. Unpublished courses are included only when asked.
    pub async fn list(
        pool: &PgPool,
        include_unpublished: bool,
    ) -> Result<Vec<MeditationCourse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meditation_courses
             WHERE ($1 = true OR is_published = true)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, MeditationCourse>(&query)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMeditationCourse,
    ) -> Result<Option<MeditationCourse>, sqlx::Error> {
        let query = format!(
            "UPDATE meditation_courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                level = COALESCE($4, level),
                cover_image_url = COALESCE($5, cover_image_url),
                is_published = COALESCE($6, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeditationCourse>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.level)
            .bind(&input.cover_image_url)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meditation_courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
