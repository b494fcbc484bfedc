//! Handler for the cross-user leaderboard.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate};
use rats_db::models::leaderboard::LeaderboardEntry;
use rats_db::repositories::{LeaderboardMetric, LeaderboardRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::today_utc;
use crate::response::DataResponse;
use crate::state::AppState;

const LEADERBOARD_SIZE: i64 = 20;
const DEFAULT_WINDOW_DAYS: i64 = 7;
const MAX_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub metric: Option<String>,
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Leaderboard {
    pub metric: LeaderboardMetric,
    pub days: i64,
    pub entries: Vec<LeaderboardEntry>,
}

/// Resolve the window length, clamped to `1..=MAX_WINDOW_DAYS`.
fn window_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, MAX_WINDOW_DAYS)
}

/// First date of a `days`-long window ending on `today`, inclusive.
fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days - 1)
}

/// GET /api/v1/leaderboard?metric=&days=
pub async fn get_leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<impl IntoResponse> {
    let metric = LeaderboardMetric::parse(
        params
            .metric
            .as_deref()
            .unwrap_or(LeaderboardMetric::MeditationMinutes.as_str()),
    )?;
    let days = window_days(params.days);
    let since = window_start(today_utc(), days);

    let entries = LeaderboardRepo::top(&state.pool, metric, since, LEADERBOARD_SIZE).await?;
    Ok(Json(DataResponse {
        data: Leaderboard {
            metric,
            days,
            entries,
        },
    }))
}
