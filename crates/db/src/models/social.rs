//! Linked social account and social post models.

use rats_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `social_accounts` table.
///
/// Token columns hold sealed ciphertext -- NEVER serialize this directly.
/// Use [`SocialAccountResponse`] for API output.
#[derive(Debug, Clone, FromRow)]
pub struct SocialAccount {
    pub id: DbId,
    pub user_id: DbId,
    pub platform: String,
    pub external_account_id: String,
    pub handle: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Token-free account representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SocialAccountResponse {
    pub id: DbId,
    pub platform: String,
    pub external_account_id: String,
    pub handle: Option<String>,
    pub token_expires_at: Option<Timestamp>,
    pub linked_at: Timestamp,
}

impl From<&SocialAccount> for SocialAccountResponse {
    fn from(a: &SocialAccount) -> Self {
        Self {
            id: a.id,
            platform: a.platform.clone(),
            external_account_id: a.external_account_id.clone(),
            handle: a.handle.clone(),
            token_expires_at: a.token_expires_at,
            linked_at: a.created_at,
        }
    }
}

/// DTO for linking (or re-linking) an account. Tokens must already be sealed.
#[derive(Debug)]
pub struct UpsertSocialAccount {
    pub platform: String,
    pub external_account_id: String,
    pub handle: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<Timestamp>,
}

/// A row from the `social_media_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialMediaPost {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub platform: String,
    pub content: String,
    pub status: String,
    pub scheduled_for: Timestamp,
    pub posted_at: Option<Timestamp>,
    pub external_post_id: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateSocialPost {
    pub event_id: Option<DbId>,
    pub platform: String,
    pub content: String,
    pub scheduled_for: Timestamp,
}
