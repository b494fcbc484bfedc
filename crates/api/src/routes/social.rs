//! Route definitions for `/social`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::social;
use crate::state::AppState;

/// Routes mounted at `/social`.
///
/// ```text
/// GET    /accounts               -> list_accounts
/// GET    /posts                  -> list_posts (?status&limit&offset)
/// POST   /posts                  -> create_post
/// DELETE /posts/{id}             -> cancel_post
/// GET    /{platform}/connect     -> connect
/// POST   /{platform}/callback    -> callback
/// DELETE /{platform}             -> unlink
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(social::list_accounts))
        .route("/posts", get(social::list_posts).post(social::create_post))
        .route("/posts/{id}", delete(social::cancel_post))
        .route("/{platform}/connect", get(social::connect))
        .route("/{platform}/callback", post(social::callback))
        .route("/{platform}", delete(social::unlink))
}
