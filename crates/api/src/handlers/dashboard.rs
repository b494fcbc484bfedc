//! Handler for the home dashboard.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use rats_core::streaks::{current_streak, longest_streak};
use rats_db::models::event::Event;
use rats_db::models::user::UserResponse;
use rats_db::repositories::{EventRepo, FoodLogRepo, MeditationProgressRepo, NutritionProfileRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::find_user;
use crate::handlers::food_logs::{build_summary, DailySummary};
use crate::middleware::auth::AuthUser;
use crate::query::today_utc;
use crate::response::DataResponse;
use crate::state::AppState;

const UPCOMING_EVENTS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct MeditationSnapshot {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub practiced_today: bool,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: UserResponse,
    pub nutrition: DailySummary,
    pub meditation: MeditationSnapshot,
    pub upcoming_events: Vec<Event>,
}

/// GET /api/v1/dashboard
///
/// Everything the home screen shows, read concurrently.
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let today = today_utc();
    let pool = &state.pool;

    let (user, entries, profile, dates, upcoming_events) = tokio::try_join!(
        find_user(&state, auth.user_id),
        async { Ok::<_, AppError>(FoodLogRepo::list_for_date(pool, auth.user_id, today).await?) },
        async { Ok::<_, AppError>(NutritionProfileRepo::find_for_user(pool, auth.user_id).await?) },
        async { Ok::<_, AppError>(MeditationProgressRepo::practice_dates(pool, auth.user_id).await?) },
        async {
            Ok::<_, AppError>(
                EventRepo::list_for_user(pool, auth.user_id, true, UPCOMING_EVENTS).await?,
            )
        },
    )?;

    let nutrition = build_summary(today, &entries, profile.as_ref())?;
    let meditation = MeditationSnapshot {
        current_streak: current_streak(&dates, today),
        longest_streak: longest_streak(&dates),
        practiced_today: dates.last() == Some(&today),
    };

    Ok(Json(DataResponse {
        data: Dashboard {
            user: UserResponse::from_user(&user, &auth.role),
            nutrition,
            meditation,
            upcoming_events,
        },
    }))
}
