//! Repository for the `social_media_posts` table.

use rats_core::social::{
    POST_CANCELLED, POST_FAILED, POST_POSTED, POST_PUBLISHING, POST_SCHEDULED,
};
use rats_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::social::{CreateSocialPost, SocialMediaPost};

const COLUMNS: &str = "id, user_id, event_id, platform, content, status, scheduled_for, \
                        posted_at, external_post_id, error_message, created_at, updated_at";

/// Scheduled, published, and failed social posts.
///
/// Lifecycle: `scheduled` -> `publishing` -> `posted` | `failed`, or
/// `scheduled` -> `cancelled`. Every update is guarded by the status it
/// leaves, so a post is claimed, and therefore published, at most once.
pub struct SocialPostRepo;

impl SocialPostRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateSocialPost,
    ) -> Result<SocialMediaPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO social_media_posts (user_id, event_id, platform, content, status, scheduled_for)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SocialMediaPost>(&query)
            .bind(user_id)
            .bind(input.event_id)
            .bind(&input.platform)
            .bind(&input.content)
            .bind(POST_SCHEDULED)
            .bind(input.scheduled_for)
            .fetch_one(executor)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<SocialMediaPost>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM social_media_posts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, SocialMediaPost>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first, optionally filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SocialMediaPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM social_media_posts
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY scheduled_for DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, SocialMediaPost>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Cancel a scheduled post. Returns `None` when the post is missing or
    /// no longer scheduled.
    pub async fn cancel(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<SocialMediaPost>, sqlx::Error> {
        let query = format!(
            "UPDATE social_media_posts SET status = $3
             WHERE id = $1 AND user_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SocialMediaPost>(&query)
            .bind(id)
            .bind(user_id)
            .bind(POST_CANCELLED)
            .bind(POST_SCHEDULED)
            .fetch_optional(pool)
            .await
    }

    /// Claim up to `limit` due posts for publishing, oldest first.
    ///
    /// Claimed rows move to `publishing` in the same statement. Rows locked
    /// by a concurrent claim are skipped, so two dispatchers never receive
    /// the same post, and a claimed post can no longer be cancelled.
    pub async fn claim_due(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<SocialMediaPost>, sqlx::Error> {
        let query = format!(
            "UPDATE social_media_posts SET status = $4
             WHERE id IN (
                 SELECT id FROM social_media_posts
                 WHERE status = $1 AND scheduled_for <= $2
                 ORDER BY scheduled_for ASC
                 LIMIT $3
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        let mut posts = sqlx::query_as::<_, SocialMediaPost>(&query)
            .bind(POST_SCHEDULED)
            .bind(now)
            .bind(limit)
            .bind(POST_PUBLISHING)
            .fetch_all(pool)
            .await?;
        posts.sort_by_key(|p| (p.scheduled_for, p.id));
        Ok(posts)
    }

    /// Record a successful publish. Returns `false` if the post was not claimed.
    pub async fn mark_posted(
        pool: &PgPool,
        id: DbId,
        external_post_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE social_media_posts
             SET status = $2, posted_at = NOW(), external_post_id = $3, error_message = NULL
             WHERE id = $1 AND status = $4",
        )
        .bind(id)
        .bind(POST_POSTED)
        .bind(external_post_id)
        .bind(POST_PUBLISHING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed publish. Returns `false` if the post was not claimed.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE social_media_posts
             SET status = $2, error_message = $3
             WHERE id = $1 AND status = $4",
        )
        .bind(id)
        .bind(POST_FAILED)
        .bind(error)
        .bind(POST_PUBLISHING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
