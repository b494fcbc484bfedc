//! Route definitions for the `/food-logs` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::food_logs::{self, MAX_IMAGE_BYTES};
use crate::state::AppState;

/// Headroom for multipart framing and the description field.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Routes mounted at `/food-logs`.
///
/// ```text
/// GET    /                -> list_food_logs (?date)
/// POST   /                -> create_food_log
/// GET    /summary         -> daily_summary (?date)
/// GET    /history         -> history (?from&to)
/// POST   /analyze         -> analyze_text
/// POST   /analyze-image   -> analyze_image (multipart)
/// GET    /{id}            -> get_food_log
/// PUT    /{id}            -> update_food_log
/// DELETE /{id}            -> delete_food_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(food_logs::list_food_logs).post(food_logs::create_food_log),
        )
        .route("/summary", get(food_logs::daily_summary))
        .route("/history", get(food_logs::history))
        .route("/analyze", post(food_logs::analyze_text))
        .route(
            "/analyze-image",
            post(food_logs::analyze_image)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route(
            "/{id}",
            get(food_logs::get_food_log)
                .put(food_logs::update_food_log)
                .delete(food_logs::delete_food_log),
        )
}
