//! Social post dispatcher.
//!
//! Claims `scheduled` posts whose time has come and publishes them through
//! the [`SocialPublisher`](crate::social::publisher::SocialPublisher) seam.
//! Each claimed post ends `posted` or `failed`; failures are not retried.
//! A post whose outcome cannot be recorded stays `publishing` and is never
//! picked up again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use rats_core::social::SocialPlatform;
use rats_core::types::Timestamp;
use rats_db::models::social::SocialMediaPost;
use rats_db::repositories::{SocialAccountRepo, SocialPostRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::social::SocialHub;

/// Posts claimed per pass.
const BATCH_SIZE: i64 = 50;

/// Posts published at the same time.
const MAX_CONCURRENT_PUBLISHES: usize = 4;

/// Longest error text stored on a failed post.
const MAX_ERROR_CHARS: usize = 500;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub posted: usize,
    pub failed: usize,
    /// Published or rejected upstream, but the status update did not land.
    pub unrecorded: usize,
}

enum Outcome {
    Posted,
    Failed,
    Unrecorded,
}

/// Run the dispatcher loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    hub: Arc<SocialHub>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Post dispatcher started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Post dispatcher stopping");
                break;
            }
            _ = ticker.tick() => {
                match run_once(&pool, &hub, Utc::now()).await {
                    Ok(stats) if stats.posted + stats.failed + stats.unrecorded > 0 => {
                        tracing::info!(
                            posted = stats.posted,
                            failed = stats.failed,
                            unrecorded = stats.unrecorded,
                            "Social posts dispatched"
                        );
                    }
                    Ok(_) => tracing::debug!("No social posts due"),
                    Err(e) => tracing::error!(error = %e, "Post dispatcher pass failed"),
                }
            }
        }
    }
}

/// Claim and publish the posts due at `now`, up to one batch.
pub async fn run_once(
    pool: &PgPool,
    hub: &SocialHub,
    now: Timestamp,
) -> Result<DispatchStats, sqlx::Error> {
    let due = SocialPostRepo::claim_due(pool, now, BATCH_SIZE).await?;

    let outcomes: Vec<Outcome> = stream::iter(due)
        .map(|post| dispatch(pool, hub, post))
        .buffer_unordered(MAX_CONCURRENT_PUBLISHES)
        .collect()
        .await;

    let mut stats = DispatchStats::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Posted => stats.posted += 1,
            Outcome::Failed => stats.failed += 1,
            Outcome::Unrecorded => stats.unrecorded += 1,
        }
    }
    Ok(stats)
}

async fn dispatch(pool: &PgPool, hub: &SocialHub, post: SocialMediaPost) -> Outcome {
    match publish(pool, hub, &post).await {
        Ok(external_id) => match SocialPostRepo::mark_posted(pool, post.id, &external_id).await {
            Ok(true) => {
                tracing::info!(post_id = post.id, platform = %post.platform, %external_id, "Social post published");
                Outcome::Posted
            }
            Ok(false) => {
                tracing::error!(post_id = post.id, %external_id, "Published post was no longer claimed");
                Outcome::Unrecorded
            }
            Err(e) => {
                tracing::error!(post_id = post.id, %external_id, error = %e, "Failed to mark post as posted");
                Outcome::Unrecorded
            }
        },
        Err(reason) => {
            tracing::warn!(post_id = post.id, platform = %post.platform, %reason, "Social post failed");
            let reason: String = reason.chars().take(MAX_ERROR_CHARS).collect();
            match SocialPostRepo::mark_failed(pool, post.id, &reason).await {
                Ok(true) => Outcome::Failed,
                Ok(false) => {
                    tracing::error!(post_id = post.id, "Failed post was no longer claimed");
                    Outcome::Unrecorded
                }
                Err(e) => {
                    tracing::error!(post_id = post.id, error = %e, "Failed to mark post as failed");
                    Outcome::Unrecorded
                }
            }
        }
    }
}

/// Look up the account, decrypt its token and publish. Errors are returned
/// as the text stored on the failed post.
async fn publish(pool: &PgPool, hub: &SocialHub, post: &SocialMediaPost) -> Result<String, String> {
    let platform = SocialPlatform::parse(&post.platform).map_err(|e| e.to_string())?;

    let account = SocialAccountRepo::find_for_user_platform(pool, post.user_id, platform.as_str())
        .await
        .map_err(|e| format!("Account lookup failed: {e}"))?
        .ok_or_else(|| format!("No {platform} account is linked"))?;

    let token = hub
        .cipher
        .decrypt(&account.access_token)
        .map_err(|e| e.to_string())?;

    hub.publisher
        .publish(platform, &token, &post.content)
        .await
        .map_err(|e| e.to_string())
}
