use std::sync::Arc;

use rats_genai::AiAnalyzer;

use crate::config::ServerConfig;
use crate::social::SocialHub;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rats_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Food, meditation and coaching analyses.
    pub ai: Arc<dyn AiAnalyzer>,
    /// OAuth clients, token cipher and post publisher.
    pub social: Arc<SocialHub>,
}
