//! Route definitions for `/meditation`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::meditation;
use crate::state::AppState;

/// Routes mounted at `/meditation`.
///
/// ```text
/// GET    /courses             -> list_courses
/// POST   /courses             -> create_course (admin)
/// GET    /courses/{id}        -> get_course
/// PUT    /courses/{id}        -> update_course (admin)
/// DELETE /courses/{id}        -> delete_course (admin)
///
/// GET    /sessions            -> list_sessions (?category)
/// POST   /sessions            -> create_session (admin)
/// GET    /sessions/{id}       -> get_session
/// PUT    /sessions/{id}       -> update_session (admin)
/// DELETE /sessions/{id}       -> delete_session (admin)
///
/// GET    /sleep               -> list_sleep_content (?kind)
/// POST   /sleep               -> create_sleep_content (admin)
/// GET    /sleep/{id}          -> get_sleep_content
/// PUT    /sleep/{id}          -> update_sleep_content (admin)
/// DELETE /sleep/{id}          -> delete_sleep_content (admin)
///
/// POST   /custom/generate     -> generate_custom
/// GET    /custom              -> list_custom
/// GET    /custom/{id}         -> get_custom
/// DELETE /custom/{id}         -> delete_custom
///
/// POST   /progress            -> record_progress
/// GET    /progress            -> list_progress
/// GET    /progress/stats      -> progress_stats (?days)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            get(meditation::list_courses).post(meditation::create_course),
        )
        .route(
            "/courses/{id}",
            get(meditation::get_course)
                .put(meditation::update_course)
                .delete(meditation::delete_course),
        )
        .route(
            "/sessions",
            get(meditation::list_sessions).post(meditation::create_session),
        )
        .route(
            "/sessions/{id}",
            get(meditation::get_session)
                .put(meditation::update_session)
                .delete(meditation::delete_session),
        )
        .route(
            "/sleep",
            get(meditation::list_sleep_content).post(meditation::create_sleep_content),
        )
        .route(
            "/sleep/{id}",
            get(meditation::get_sleep_content)
                .put(meditation::update_sleep_content)
                .delete(meditation::delete_sleep_content),
        )
        .route("/custom/generate", post(meditation::generate_custom))
        .route("/custom", get(meditation::list_custom))
        .route(
            "/custom/{id}",
            get(meditation::get_custom).delete(meditation::delete_custom),
        )
        .route(
            "/progress",
            get(meditation::list_progress).post(meditation::record_progress),
        )
        .route("/progress/stats", get(meditation::progress_stats))
}
