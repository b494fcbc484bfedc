//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                                -> list_events (?upcoming&limit)
/// POST   /                                -> create_event
/// GET    /{id}                            -> get_event
/// PUT    /{id}                            -> update_event
/// DELETE /{id}                            -> delete_event
/// POST   /{id}/reminder-days/{day}/toggle -> toggle_reminder
/// GET    /{id}/reminders                  -> list_reminders
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/{id}/reminder-days/{day}/toggle",
            post(events::toggle_reminder),
        )
        .route("/{id}/reminders", get(events::list_reminders))
}
