//! Handlers for the `/events` resource and its reminder days.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use rats_core::error::CoreError;
use rats_core::reminders::{normalize_reminder_days, reminder_schedule, toggle_reminder_day};
use rats_core::social::validate_handle;
use rats_core::types::{DbId, Timestamp};
use rats_db::models::event::{CreateEvent, Event, EventSocial, UpdateEvent};
use rats_db::repositories::{EventReminderRepo, EventRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Social handles as entered by the user. Blank strings clear a handle.
#[derive(Debug, Default, Deserialize)]
pub struct EventSocialInput {
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    #[serde(default)]
    pub auto_post: bool,
}

impl EventSocialInput {
    fn into_social(self) -> Result<EventSocial, CoreError> {
        let clean = |h: Option<String>| -> Result<Option<String>, CoreError> {
            match h {
                Some(h) if !h.trim().is_empty() => validate_handle(&h).map(Some),
                _ => Ok(None),
            }
        };
        Ok(EventSocial {
            twitter: clean(self.twitter)?,
            instagram: clean(self.instagram)?,
            facebook: clean(self.facebook)?,
            auto_post: self.auto_post,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub location: Option<String>,
    pub starts_at: Timestamp,
    #[serde(default)]
    pub reminder_days: Vec<i32>,
    #[serde(default)]
    pub social: Option<EventSocialInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub reminder_days: Option<Vec<i32>>,
    pub social: Option<EventSocialInput>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsParams {
    #[serde(default)]
    pub upcoming: bool,
    pub limit: Option<i64>,
}

/// One entry of an event's reminder schedule.
#[derive(Debug, Serialize)]
pub struct ReminderStatus {
    pub reminder_day: i32,
    pub fire_date: NaiveDate,
    /// Set once the scheduler dispatched this reminder.
    pub dispatched_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/events?upcoming=&limit=
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListEventsParams>,
) -> AppResult<impl IntoResponse> {
    let limit = rats_db::clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let events = EventRepo::list_for_user(&state.pool, auth.user_id, params.upcoming, limit).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateEventRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let reminder_days = normalize_reminder_days(&input.reminder_days)?;
    let social = input.social.unwrap_or_default().into_social()?;

    let event = EventRepo::create(
        &state.pool,
        auth.user_id,
        &CreateEvent {
            title: input.title.trim().to_string(),
            description: input.description,
            location: input.location,
            starts_at: input.starts_at,
            reminder_days,
            social,
        },
    )
    .await?;

    tracing::info!(event_id = event.id, user_id = auth.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = find_event(&state, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let reminder_days = input
        .reminder_days
        .as_deref()
        .map(normalize_reminder_days)
        .transpose()?;
    let social = input.social.map(EventSocialInput::into_social).transpose()?;

    let update = UpdateEvent {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description,
        location: input.location,
        starts_at: input.starts_at,
        reminder_days,
        social,
    };

    let event = EventRepo::update(&state.pool, auth.user_id, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;

    tracing::info!(event_id = id, user_id = auth.user_id, "Event updated");
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EventRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Event", id }));
    }
    tracing::info!(event_id = id, user_id = auth.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/events/{id}/reminder-days/{day}/toggle
///
/// Add `day` to the event's reminder days, or remove it when already set.
pub async fn toggle_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, day)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    // Reject unknown days before touching the database.
    toggle_reminder_day(&[], day)?;

    let event = find_event(&state, auth.user_id, id).await?;
    let days = toggle_reminder_day(&event.reminder_days, day)?;

    let event = EventRepo::set_reminder_days(&state.pool, auth.user_id, id, &days)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;

    tracing::debug!(event_id = id, day, reminder_days = ?event.reminder_days, "Reminder day toggled");
    Ok(Json(DataResponse { data: event }))
}

/// GET /api/v1/events/{id}/reminders
///
/// The event's reminder schedule in firing order, with dispatch state.
pub async fn list_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = find_event(&state, auth.user_id, id).await?;
    let dispatched = EventReminderRepo::list_for_event(&state.pool, event.id).await?;

    let schedule: Vec<ReminderStatus> = reminder_schedule(event.starts_at, &event.reminder_days)
        .into_iter()
        .map(|(reminder_day, fire_date)| ReminderStatus {
            reminder_day,
            fire_date,
            dispatched_at: dispatched
                .iter()
                .find(|r| r.reminder_day == reminder_day && r.fire_date == fire_date)
                .map(|r| r.dispatched_at),
        })
        .collect();

    Ok(Json(DataResponse { data: schedule }))
}

async fn find_event(state: &AppState, user_id: DbId, id: DbId) -> AppResult<Event> {
    EventRepo::find_for_user(&state.pool, user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))
}
