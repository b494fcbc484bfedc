//! Handlers for the nutrition profile and AI coaching.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use rats_core::error::CoreError;
use rats_core::nutrition::{
    compute_targets, daily_totals, ActivityLevel, Goal, MacroTotals, NutritionTargets, Sex,
};
use rats_db::models::nutrition_profile::{NutritionProfile, UpsertNutritionProfile};
use rats_db::repositories::{FoodLogRepo, NutritionProfileRepo};
use rats_genai::analysis::{CoachingContext, NutritionAdvice};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_ai_configured;
use crate::middleware::auth::AuthUser;
use crate::query::today_utc;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_DIETARY_PREFERENCES: usize = 20;
const MAX_PREFERENCE_CHARS: usize = 50;

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertNutritionProfileRequest {
    pub sex: String,
    #[validate(range(min = 13, max = 120, message = "must be between 13 and 120"))]
    pub age: i32,
    #[validate(range(min = 100.0, max = 250.0, message = "must be between 100 and 250 cm"))]
    pub height_cm: f64,
    #[validate(range(min = 30.0, max = 400.0, message = "must be between 30 and 400 kg"))]
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal: String,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[validate(range(min = 1200.0, max = 6000.0, message = "must be between 1200 and 6000 kcal"))]
    pub calorie_target_override: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CoachRequest {
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NutritionProfileResponse {
    pub profile: NutritionProfile,
    pub targets: NutritionTargets,
}

#[derive(Debug, Serialize)]
pub struct CoachResponse {
    pub advice: NutritionAdvice,
    pub fallback: bool,
    pub targets: Option<NutritionTargets>,
    pub totals: MacroTotals,
}

fn normalize_preferences(prefs: Vec<String>) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = prefs
        .into_iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    out.sort();
    out.dedup();

    if out.len() > MAX_DIETARY_PREFERENCES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_DIETARY_PREFERENCES} dietary preferences are allowed"
        )));
    }
    if let Some(p) = out.iter().find(|p| p.chars().count() > MAX_PREFERENCE_CHARS) {
        return Err(CoreError::Validation(format!(
            "Dietary preference '{p}' exceeds {MAX_PREFERENCE_CHARS} characters"
        )));
    }
    Ok(out)
}

fn with_targets(profile: NutritionProfile) -> AppResult<NutritionProfileResponse> {
    let targets = compute_targets(&profile.body_profile()?);
    Ok(NutritionProfileResponse { profile, targets })
}

/// GET /api/v1/nutrition/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let profile = NutritionProfileRepo::find_for_user(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NutritionProfile",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: with_targets(profile)?,
    }))
}

/// PUT /api/v1/nutrition/profile
///
/// Create or replace the caller's profile. Returns it with computed targets.
pub async fn upsert_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpsertNutritionProfileRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let sex = Sex::parse(&input.sex)?;
    let activity_level = ActivityLevel::parse(&input.activity_level)?;
    let goal = Goal::parse(&input.goal)?;
    let dietary_preferences = normalize_preferences(input.dietary_preferences)?;

    let profile = NutritionProfileRepo::upsert(
        &state.pool,
        auth.user_id,
        &UpsertNutritionProfile {
            sex: sex.as_str().to_string(),
            age: input.age,
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            activity_level: activity_level.as_str().to_string(),
            goal: goal.as_str().to_string(),
            dietary_preferences,
            calorie_target_override: input.calorie_target_override,
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, goal = %profile.goal, "Nutrition profile saved");
    Ok(Json(DataResponse {
        data: with_targets(profile)?,
    }))
}

/// POST /api/v1/nutrition/coach
///
/// AI advice from the caller's profile and today's intake. Works without a
/// profile; the advice is then based on intake alone.
pub async fn coach(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CoachRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_ai_configured(&state)?;

    let today = today_utc();
    let (profile, entries) = tokio::try_join!(
        NutritionProfileRepo::find_for_user(&state.pool, auth.user_id),
        FoodLogRepo::list_for_date(&state.pool, auth.user_id, today),
    )?;

    let targets = match &profile {
        Some(p) => Some(compute_targets(&p.body_profile()?)),
        None => None,
    };
    let totals = daily_totals(&entries);

    let ctx = CoachingContext {
        targets,
        totals,
        goal: profile.as_ref().map(|p| p.goal.clone()),
        dietary_preferences: profile
            .map(|p| p.dietary_preferences)
            .unwrap_or_default(),
        question: input
            .question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty()),
    };

    let outcome = state.ai.nutrition_advice(&ctx).await?;
    tracing::info!(user_id = auth.user_id, fallback = outcome.fallback, "Nutrition advice generated");

    Ok(Json(DataResponse {
        data: CoachResponse {
            advice: outcome.result,
            fallback: outcome.fallback,
            targets,
            totals,
        },
    }))
}
