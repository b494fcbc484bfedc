//! Route definitions for `/leaderboard`.

use axum::routing::get;
use axum::Router;

use crate::handlers::leaderboard;
use crate::state::AppState;

/// `GET /leaderboard -> get_leaderboard` (?metric&days)
pub fn router() -> Router<AppState> {
    Router::new().route("/leaderboard", get(leaderboard::get_leaderboard))
}
