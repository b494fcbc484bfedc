pub mod auth;
pub mod dashboard;
pub mod events;
pub mod food_logs;
pub mod health;
pub mod leaderboard;
pub mod meditation;
pub mod nutrition;
pub mod profile;
pub mod social;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register, /auth/login, /auth/refresh       public
/// /auth/logout, /auth/me                           requires auth
///
/// /profile                                         get, update, deactivate
/// /profile/password                                change password
///
/// /events                                          list, create
/// /events/{id}                                     get, update, delete
/// /events/{id}/reminder-days/{day}/toggle          toggle a reminder day
/// /events/{id}/reminders                           reminder schedule
///
/// /food-logs                                       list (?date), create
/// /food-logs/{id}                                  get, update, delete
/// /food-logs/summary                               daily summary (?date)
/// /food-logs/history                               per-day calories (?from&to)
/// /food-logs/analyze                               AI analysis of a description
/// /food-logs/analyze-image                         AI analysis of a photo
///
/// /meditation/courses[/{id}]                       catalog (admin writes)
/// /meditation/sessions[/{id}]                      catalog (admin writes)
/// /meditation/sleep[/{id}]                         catalog (admin writes)
/// /meditation/custom/generate                      AI-written meditation
/// /meditation/custom[/{id}]                        saved custom meditations
/// /meditation/progress                             record, list
/// /meditation/progress/stats                       streaks and heatmap
///
/// /nutrition/profile                               get, upsert
/// /nutrition/coach                                 AI advice
///
/// /social/accounts                                 linked accounts
/// /social/{platform}/connect                       start OAuth linking
/// /social/{platform}/callback                      finish OAuth linking
/// /social/{platform}                               unlink
/// /social/posts[/{id}]                             list, create, cancel
///
/// /dashboard                                       home screen
/// /leaderboard                                     ranked users (?metric&days)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/events", events::router())
        .nest("/food-logs", food_logs::router())
        .nest("/meditation", meditation::router())
        .nest("/nutrition", nutrition::router())
        .nest("/social", social::router())
        .merge(dashboard::router())
        .merge(leaderboard::router())
}
