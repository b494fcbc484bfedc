//! Hourly purge of dead refresh-token sessions.

use std::time::Duration;

use chrono::Utc;
use rats_core::types::Timestamp;
use rats_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Revoked and expired rows are kept this long for audit before deletion.
const RETENTION_DAYS: i64 = 7;

pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        retention_days = RETENTION_DAYS,
        "Session cleanup started"
    );
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool, Utc::now()).await {
                    Ok(0) => {}
                    Ok(deleted) => tracing::info!(deleted, "Stale sessions purged"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}

/// Delete sessions that died more than [`RETENTION_DAYS`] before `now`.
pub async fn run_once(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
    SessionRepo::purge_before(pool, now - chrono::Duration::days(RETENTION_DAYS)).await
}
