//! Event reminder scheduler.
//!
//! On every tick, loads events starting between today (UTC) and the largest
//! reminder offset ahead, records each reminder that fires today, and queues
//! auto-posts for events that ask for them. The unique key on
//! `event_reminders` makes a reminder fire at most once, however often the
//! task runs.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rats_core::reminders::{due_reminder_days, MAX_REMINDER_DAY};
use rats_core::social::{compose_reminder_post, ReminderPostInput};
use rats_core::types::Timestamp;
use rats_db::models::event::Event;
use rats_db::models::social::CreateSocialPost;
use rats_db::repositories::{EventReminderRepo, EventRepo, SocialAccountRepo, SocialPostRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Outcome of one scheduler pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReminderStats {
    pub events_scanned: usize,
    pub reminders_recorded: usize,
    pub posts_queued: usize,
}

/// Run the reminder scheduler loop until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Reminder scheduler started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder scheduler stopping");
                break;
            }
            _ = ticker.tick() => {
                match run_once(&pool, Utc::now()).await {
                    Ok(stats) if stats.reminders_recorded > 0 => {
                        tracing::info!(
                            reminders = stats.reminders_recorded,
                            posts = stats.posts_queued,
                            "Reminders dispatched"
                        );
                    }
                    Ok(stats) => {
                        tracing::debug!(events = stats.events_scanned, "No reminders due");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reminder scheduler pass failed");
                    }
                }
            }
        }
    }
}

/// Perform one scheduler pass as of `now`.
///
/// A failure on one event is logged and does not stop the others.
pub async fn run_once(pool: &PgPool, now: Timestamp) -> Result<ReminderStats, sqlx::Error> {
    let today = now.date_naive();
    let from = today.and_time(chrono::NaiveTime::MIN).and_utc();
    let to = now + ChronoDuration::days(i64::from(MAX_REMINDER_DAY) + 1);

    let events = EventRepo::list_with_reminders_between(pool, from, to).await?;
    let mut stats = ReminderStats {
        events_scanned: events.len(),
        ..ReminderStats::default()
    };

    for event in &events {
        for day in due_reminder_days(event.starts_at, &event.reminder_days, today) {
            match fire(pool, event, day, now).await {
                Ok(Some(queued)) => {
                    stats.reminders_recorded += 1;
                    stats.posts_queued += queued;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(event_id = event.id, day, error = %e, "Failed to dispatch reminder");
                }
            }
        }
    }

    Ok(stats)
}

/// Record one reminder and queue its auto-posts in a single transaction.
///
/// Returns the number of posts queued, or `None` when the reminder had
/// already fired. If any insert fails nothing is kept, and the next pass
/// retries the whole reminder.
async fn fire(
    pool: &PgPool,
    event: &Event,
    day: i32,
    now: Timestamp,
) -> Result<Option<usize>, sqlx::Error> {
    let today = now.date_naive();
    let posts = if event.social.auto_post {
        auto_posts(pool, event, day, now).await?
    } else {
        Vec::new()
    };

    let mut tx = pool.begin().await?;
    let Some(reminder) =
        EventReminderRepo::record(&mut *tx, event.id, event.user_id, day, today).await?
    else {
        return Ok(None);
    };
    for post in &posts {
        SocialPostRepo::create(&mut *tx, event.user_id, post).await?;
    }
    tx.commit().await?;

    tracing::debug!(event_id = event.id, reminder_id = reminder.id, day, "Reminder recorded");
    for post in &posts {
        tracing::info!(event_id = event.id, platform = %post.platform, "Auto-post queued");
    }
    Ok(Some(posts.len()))
}

/// Reminder posts for every platform the event names that has a linked account.
async fn auto_posts(
    pool: &PgPool,
    event: &Event,
    day: i32,
    now: Timestamp,
) -> Result<Vec<CreateSocialPost>, sqlx::Error> {
    let input = ReminderPostInput {
        title: &event.title,
        event_date: event.starts_at.date_naive(),
        location: event.location.as_deref(),
        days_before: day,
    };

    let mut posts = Vec::new();
    for platform in event.social.platforms() {
        let linked =
            SocialAccountRepo::find_for_user_platform(pool, event.user_id, platform.as_str())
                .await?;
        if linked.is_none() {
            tracing::debug!(event_id = event.id, %platform, "Skipping auto-post: account not linked");
            continue;
        }
        posts.push(CreateSocialPost {
            event_id: Some(event.id),
            platform: platform.as_str().to_string(),
            content: compose_reminder_post(platform, &input, event.social.handle_for(platform)),
            scheduled_for: now,
        });
    }
    Ok(posts)
}
