//! Event and reminder models.

use chrono::NaiveDate;
use rats_core::social::SocialPlatform;
use rats_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

/// Social handles attached to an event, stored as a JSONB sub-document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSocial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    /// Publish reminders to linked accounts when they fire.
    #[serde(default)]
    pub auto_post: bool,
}

impl EventSocial {
    /// The handle configured for `platform`, if any.
    pub fn handle_for(&self, platform: SocialPlatform) -> Option<&str> {
        match platform {
            SocialPlatform::Twitter => self.twitter.as_deref(),
            SocialPlatform::Instagram => self.instagram.as_deref(),
            SocialPlatform::Facebook => self.facebook.as_deref(),
        }
    }

    /// Platforms that have a handle set.
    pub fn platforms(&self) -> Vec<SocialPlatform> {
        SocialPlatform::ALL
            .into_iter()
            .filter(|p| self.handle_for(*p).is_some())
            .collect()
    }
}

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub reminder_days: Vec<i32>,
    pub social: Json<EventSocial>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an event. Reminder days must already be normalized.
#[derive(Debug)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub reminder_days: Vec<i32>,
    pub social: EventSocial,
}

/// DTO for updating an event. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub reminder_days: Option<Vec<i32>>,
    pub social: Option<EventSocial>,
}

/// A row from the `event_reminders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventReminder {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub reminder_day: i32,
    pub fire_date: NaiveDate,
    pub dispatched_at: Timestamp,
}
