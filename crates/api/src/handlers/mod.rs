//! HTTP handlers, one module per resource.

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod food_logs;
pub mod leaderboard;
pub mod meditation;
pub mod nutrition;
pub mod profile;
pub mod social;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Reject AI-backed requests with 503 when no model API key is configured.
pub(crate) fn ensure_ai_configured(state: &AppState) -> AppResult<()> {
    if state.ai.is_configured() {
        Ok(())
    } else {
        Err(AppError::ServiceUnavailable(
            "AI analysis is not configured".into(),
        ))
    }
}
