//! Route definitions for `/profile`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`.
///
/// ```text
/// GET    /            -> get_profile
/// PUT    /            -> update_profile
/// DELETE /            -> deactivate_account
/// PUT    /password    -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::deactivate_account),
        )
        .route("/password", put(profile::change_password))
}
