//! Repository for the `social_accounts` table.

use rats_core::types::DbId;
use sqlx::PgPool;

use crate::models::social::{SocialAccount, UpsertSocialAccount};

const COLUMNS: &str = "id, user_id, platform, external_account_id, handle, access_token, \
                        refresh_token, token_expires_at, created_at, updated_at";

/// Linked third-party accounts. At most one per user and platform.
pub struct SocialAccountRepo;

impl SocialAccountRepo {
    /// Link an account, replacing tokens if the platform was already linked.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertSocialAccount,
    ) -> Result<SocialAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO social_accounts
                (user_id, platform, external_account_id, handle, access_token,
                 refresh_token, token_expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_social_accounts_user_platform DO UPDATE SET
                external_account_id = EXCLUDED.external_account_id,
                handle = EXCLUDED.handle,
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                token_expires_at = EXCLUDED.token_expires_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SocialAccount>(&query)
            .bind(user_id)
            .bind(&input.platform)
            .bind(&input.external_account_id)
            .bind(&input.handle)
            .bind(&input.access_token)
            .bind(&input.refresh_token)
            .bind(input.token_expires_at)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SocialAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM social_accounts WHERE user_id = $1 ORDER BY platform ASC"
        );
        sqlx::query_as::<_, SocialAccount>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user_platform(
        pool: &PgPool,
        user_id: DbId,
        platform: &str,
    ) -> Result<Option<SocialAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM social_accounts WHERE user_id = $1 AND platform = $2"
        );
        sqlx::query_as::<_, SocialAccount>(&query)
            .bind(user_id)
            .bind(platform)
            .fetch_optional(pool)
            .await
    }

    /// Unlink an account. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, platform: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM social_accounts WHERE user_id = $1 AND platform = $2")
            .bind(user_id)
            .bind(platform)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
