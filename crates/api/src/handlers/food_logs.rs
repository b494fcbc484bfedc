//! Handlers for the `/food-logs` resource, daily summaries and AI analysis.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate};
use rats_core::error::CoreError;
use rats_core::nutrition::{
    compute_targets, daily_totals, macro_percentages, remaining, validate_meal_type, MacroSplit,
    MacroTotals, NutritionTargets, MEAL_SNACK, SOURCE_AI, SOURCE_MANUAL,
};
use rats_core::social::truncate_with_ellipsis;
use rats_core::types::DbId;
use rats_db::models::food_log::{CreateFoodLog, FoodLog, UpdateFoodLog};
use rats_db::models::nutrition_profile::NutritionProfile;
use rats_db::repositories::{FoodLogRepo, NutritionProfileRepo};
use rats_genai::analysis::FoodAnalysis;
use rats_genai::InlineImage;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_ai_configured;
use crate::middleware::auth::AuthUser;
use crate::query::{today_utc, DateParams, DateRangeParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image MIME types.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

const MAX_FOOD_NAME_CHARS: usize = 200;

const DEFAULT_HISTORY_DAYS: i64 = 7;
const MAX_HISTORY_DAYS: i64 = 366;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFoodLogRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub food_name: String,
    pub meal_type: Option<String>,
    #[validate(range(min = 0.0, max = 20000.0, message = "must be between 0 and 20000"))]
    pub calories: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0, message = "must be between 0 and 2000"))]
    pub protein_g: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0, message = "must be between 0 and 2000"))]
    pub carbs_g: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0, message = "must be between 0 and 2000"))]
    pub fat_g: Option<f64>,
    #[validate(range(min = 0.0, max = 500.0, message = "must be between 0 and 500"))]
    pub fiber_g: Option<f64>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub serving_size: Option<String>,
    pub log_date: Option<NaiveDate>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFoodLogRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub food_name: Option<String>,
    pub meal_type: Option<String>,
    #[validate(range(min = 0.0, max = 20000.0, message = "must be between 0 and 20000"))]
    pub calories: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0, message = "must be between 0 and 2000"))]
    pub protein_g: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0, message = "must be between 0 and 2000"))]
    pub carbs_g: Option<f64>,
    #[validate(range(min = 0.0, max = 2000.0, message = "must be between 0 and 2000"))]
    pub fat_g: Option<f64>,
    #[validate(range(min = 0.0, max = 500.0, message = "must be between 0 and 500"))]
    pub fiber_g: Option<f64>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub serving_size: Option<String>,
    pub log_date: Option<NaiveDate>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeFoodRequest {
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub description: String,
    pub meal_type: Option<String>,
    /// Also save the analysis as a food log when it is not the fallback.
    #[serde(default)]
    pub log: bool,
    pub log_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: FoodAnalysis,
    /// `true` when the model reply could not be used and a static estimate
    /// was returned instead.
    pub fallback: bool,
    pub food_log: Option<FoodLog>,
}

/// Nutrition state of one day.
#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub entries: usize,
    pub totals: MacroTotals,
    pub macro_split: MacroSplit,
    /// Present only when the user has a nutrition profile.
    pub targets: Option<NutritionTargets>,
    pub remaining: Option<NutritionTargets>,
}

/// Build the summary of `entries` logged on `date`.
pub(crate) fn build_summary(
    date: NaiveDate,
    entries: &[FoodLog],
    profile: Option<&NutritionProfile>,
) -> AppResult<DailySummary> {
    let totals = daily_totals(entries);
    let targets = match profile {
        Some(p) => Some(compute_targets(&p.body_profile()?)),
        None => None,
    };
    Ok(DailySummary {
        date,
        entries: entries.len(),
        totals,
        macro_split: macro_percentages(&totals),
        remaining: targets.as_ref().map(|t| remaining(t, &totals)),
        targets,
    })
}

fn resolve_meal_type(meal_type: Option<String>) -> Result<String, CoreError> {
    let meal_type = meal_type.unwrap_or_else(|| MEAL_SNACK.to_string());
    validate_meal_type(&meal_type)?;
    Ok(meal_type)
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/food-logs?date=
pub async fn list_food_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.date.unwrap_or_else(today_utc);
    let logs = FoodLogRepo::list_for_date(&state.pool, auth.user_id, date).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// POST /api/v1/food-logs
pub async fn create_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateFoodLogRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let meal_type = resolve_meal_type(input.meal_type)?;

    let log = FoodLogRepo::create(
        &state.pool,
        auth.user_id,
        &CreateFoodLog {
            food_name: input.food_name.trim().to_string(),
            meal_type,
            calories: input.calories,
            protein_g: input.protein_g,
            carbs_g: input.carbs_g,
            fat_g: input.fat_g,
            fiber_g: input.fiber_g,
            serving_size: input.serving_size,
            log_date: input.log_date.unwrap_or_else(today_utc),
            source: SOURCE_MANUAL.to_string(),
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(food_log_id = log.id, user_id = auth.user_id, "Food log created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}

/// GET /api/v1/food-logs/{id}
pub async fn get_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = FoodLogRepo::find_for_user(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FoodLog",
            id,
        }))?;
    Ok(Json(DataResponse { data: log }))
}

/// PUT /api/v1/food-logs/{id}
pub async fn update_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFoodLogRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(meal_type) = &input.meal_type {
        validate_meal_type(meal_type)?;
    }

    let update = UpdateFoodLog {
        food_name: input.food_name.map(|n| n.trim().to_string()),
        meal_type: input.meal_type,
        calories: input.calories,
        protein_g: input.protein_g,
        carbs_g: input.carbs_g,
        fat_g: input.fat_g,
        fiber_g: input.fiber_g,
        serving_size: input.serving_size,
        log_date: input.log_date,
        notes: input.notes,
    };

    let log = FoodLogRepo::update(&state.pool, auth.user_id, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FoodLog",
            id,
        }))?;
    Ok(Json(DataResponse { data: log }))
}

/// DELETE /api/v1/food-logs/{id}
pub async fn delete_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !FoodLogRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "FoodLog",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// GET /api/v1/food-logs/summary?date=
pub async fn daily_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.date.unwrap_or_else(today_utc);
    let (entries, profile) = tokio::try_join!(
        FoodLogRepo::list_for_date(&state.pool, auth.user_id, date),
        NutritionProfileRepo::find_for_user(&state.pool, auth.user_id),
    )?;
    let summary = build_summary(date, &entries, profile.as_ref())?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/food-logs/history?from=&to=
///
/// Per-day calorie totals. Defaults to the last 7 days ending today.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let to = params.to.unwrap_or_else(today_utc);
    let from = params
        .from
        .unwrap_or_else(|| to - Duration::days(DEFAULT_HISTORY_DAYS - 1));

    if from > to {
        return Err(AppError::Core(CoreError::Validation(
            "from must not be after to".into(),
        )));
    }
    if (to - from).num_days() >= MAX_HISTORY_DAYS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "History range must not exceed {MAX_HISTORY_DAYS} days"
        ))));
    }

    let days = FoodLogRepo::daily_calories(&state.pool, auth.user_id, from, to).await?;
    Ok(Json(DataResponse { data: days }))
}

// ---------------------------------------------------------------------------
// AI analysis
// ---------------------------------------------------------------------------

/// POST /api/v1/food-logs/analyze
///
/// Estimate nutrients from a text description. With `log: true` a usable
/// analysis is also saved as a food log with `source = ai`.
pub async fn analyze_text(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<AnalyzeFoodRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let meal_type = resolve_meal_type(input.meal_type)?;
    ensure_ai_configured(&state)?;

    let outcome = state.ai.analyze_food_text(input.description.trim()).await?;
    tracing::info!(
        user_id = auth.user_id,
        fallback = outcome.fallback,
        "Food text analyzed"
    );

    let food_log = if input.log && !outcome.fallback {
        let log = FoodLogRepo::create(
            &state.pool,
            auth.user_id,
            &analysis_to_log(
                &outcome.result,
                meal_type,
                input.log_date.unwrap_or_else(today_utc),
            ),
        )
        .await?;
        Some(log)
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: AnalysisResponse {
            analysis: outcome.result,
            fallback: outcome.fallback,
            food_log,
        },
    }))
}

/// POST /api/v1/food-logs/analyze-image
///
/// Multipart upload with an `image` part (JPEG, PNG or WebP, at most 5 MiB)
/// and an optional `description` hint.
pub async fn analyze_image(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    ensure_ai_configured(&state)?;

    let mut image: Option<InlineImage> = None;
    let mut hint: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("image") => {
                let mime_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
                    return Err(AppError::BadRequest(format!(
                        "Unsupported image type '{mime_type}'. Must be one of: {}",
                        ALLOWED_IMAGE_TYPES.join(", ")
                    )));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if data.is_empty() {
                    return Err(AppError::BadRequest("Image is empty".into()));
                }
                if data.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest(format!(
                        "Image exceeds the {} MiB limit",
                        MAX_IMAGE_BYTES / (1024 * 1024)
                    )));
                }
                image = Some(InlineImage {
                    mime_type,
                    data: data.to_vec(),
                });
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                hint = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest("Missing 'image' field".into()))?;
    let outcome = state.ai.analyze_food_image(&image, hint.as_deref()).await?;

    tracing::info!(
        user_id = auth.user_id,
        bytes = image.data.len(),
        fallback = outcome.fallback,
        "Food image analyzed"
    );

    Ok(Json(DataResponse {
        data: AnalysisResponse {
            analysis: outcome.result,
            fallback: outcome.fallback,
            food_log: None,
        },
    }))
}

fn analysis_to_log(analysis: &FoodAnalysis, meal_type: String, log_date: NaiveDate) -> CreateFoodLog {
    CreateFoodLog {
        food_name: truncate_with_ellipsis(&analysis.food_name, MAX_FOOD_NAME_CHARS),
        meal_type,
        calories: Some(analysis.calories),
        protein_g: Some(analysis.protein_g),
        carbs_g: Some(analysis.carbs_g),
        fat_g: Some(analysis.fat_g),
        fiber_g: Some(analysis.fiber_g),
        serving_size: analysis.serving_size.clone(),
        log_date,
        source: SOURCE_AI.to_string(),
        notes: analysis.notes.clone(),
    }
}
