//! Route definitions for `/nutrition`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::nutrition;
use crate::state::AppState;

/// Routes mounted at `/nutrition`.
///
/// ```text
/// GET    /profile    -> get_profile
/// PUT    /profile    -> upsert_profile
/// POST   /coach      -> coach
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(nutrition::get_profile).put(nutrition::upsert_profile),
        )
        .route("/coach", post(nutrition::coach))
}
