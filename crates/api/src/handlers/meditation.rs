//! Handlers for the meditation catalog, custom meditations and progress.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use rats_core::error::CoreError;
use rats_core::meditation::{
    clamp_stats_days, secs_to_minutes, validate_category, validate_level, validate_sleep_kind,
    MAX_CUSTOM_MINUTES, MAX_SESSION_SECS, MIN_CUSTOM_MINUTES, MIN_SESSION_SECS,
};
use rats_core::streaks::{current_streak, heatmap, longest_streak, DailyPractice, HeatmapCell};
use rats_core::types::{DbId, Timestamp};
use rats_db::models::meditation::{
    CreateCustomMeditation, CreateMeditation, CreateMeditationCourse, CreateMeditationProgress,
    CreateSleepContent, CustomMeditation, MeditationCourseDetail, UpdateMeditation,
    UpdateMeditationCourse, UpdateSleepContent,
};
use rats_db::repositories::{
    CustomMeditationRepo, MeditationCourseRepo, MeditationProgressRepo, MeditationRepo,
    SleepContentRepo,
};
use rats_genai::analysis::MeditationRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_ai_configured;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{today_utc, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KindParams {
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateMeditationRequest {
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub mood: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub focus: Option<String>,
    #[validate(range(
        min = MIN_CUSTOM_MINUTES,
        max = MAX_CUSTOM_MINUTES,
        message = "must be between 1 and 60 minutes"
    ))]
    pub duration_mins: i32,
}

#[derive(Debug, Serialize)]
pub struct GeneratedMeditation {
    pub meditation: CustomMeditation,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecordProgressRequest {
    pub meditation_id: Option<DbId>,
    pub custom_meditation_id: Option<DbId>,
    pub duration_secs: i32,
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct ProgressStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_minutes: f64,
    pub total_sessions: i64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub heatmap: Vec<HeatmapCell>,
}

// ---------------------------------------------------------------------------
// Catalog (read)
// ---------------------------------------------------------------------------

/// GET /api/v1/meditation/courses
///
/// Admins also see unpublished courses.
pub async fn list_courses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let courses = MeditationCourseRepo::list(&state.pool, auth.is_admin()).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/meditation/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = MeditationCourseRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.is_published || auth.is_admin())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MeditationCourse",
            id,
        }))?;
    let sessions = MeditationRepo::list_for_course(&state.pool, id).await?;
    let total_duration_secs = sessions.iter().map(|s| i64::from(s.duration_secs)).sum();

    Ok(Json(DataResponse {
        data: MeditationCourseDetail {
            course,
            sessions,
            total_duration_secs,
        },
    }))
}

/// GET /api/v1/meditation/sessions?category=
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<CategoryParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(category) = &params.category {
        validate_category(category)?;
    }
    let sessions =
        MeditationRepo::list(&state.pool, params.category.as_deref(), auth.is_admin()).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/meditation/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = MeditationRepo::find_by_id(&state.pool, id, auth.is_admin())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meditation",
            id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}

/// GET /api/v1/meditation/sleep?kind=
pub async fn list_sleep_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<KindParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(kind) = &params.kind {
        validate_sleep_kind(kind)?;
    }
    let items = SleepContentRepo::list(&state.pool, params.kind.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// Catalog management (admin)
// ---------------------------------------------------------------------------

fn require_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len == 0 || len > 200 {
        return Err(CoreError::Validation("title must be 1-200 characters".into()));
    }
    Ok(())
}

fn validate_catalog_duration(secs: i32) -> Result<(), CoreError> {
    if !(MIN_SESSION_SECS..=MAX_SESSION_SECS).contains(&secs) {
        return Err(CoreError::Validation(format!(
            "duration_secs must be between {MIN_SESSION_SECS} and {MAX_SESSION_SECS}"
        )));
    }
    Ok(())
}

/// POST /api/v1/meditation/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateMeditationCourse>,
) -> AppResult<impl IntoResponse> {
    require_title(&input.title)?;
    if let Some(level) = &input.level {
        validate_level(level)?;
    }
    let course = MeditationCourseRepo::create(&state.pool, &input).await?;
    tracing::info!(course_id = course.id, user_id = admin.user_id, "Meditation course created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// PUT /api/v1/meditation/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMeditationCourse>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_title(title)?;
    }
    if let Some(level) = &input.level {
        validate_level(level)?;
    }
    let course = MeditationCourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MeditationCourse",
            id,
        }))?;
    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/meditation/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MeditationCourseRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "MeditationCourse",
            id,
        }));
    }
    tracing::info!(course_id = id, user_id = admin.user_id, "Meditation course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/meditation/sessions
pub async fn create_session(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateMeditation>,
) -> AppResult<impl IntoResponse> {
    require_title(&input.title)?;
    validate_category(&input.category)?;
    validate_catalog_duration(input.duration_secs)?;
    if let Some(course_id) = input.course_id {
        ensure_course_exists(&state, course_id).await?;
    }
    let session = MeditationRepo::create(&state.pool, &input).await?;
    tracing::info!(meditation_id = session.id, user_id = admin.user_id, "Meditation created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// PUT /api/v1/meditation/sessions/{id}
pub async fn update_session(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMeditation>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_title(title)?;
    }
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    if let Some(secs) = input.duration_secs {
        validate_catalog_duration(secs)?;
    }
    if let Some(course_id) = input.course_id {
        ensure_course_exists(&state, course_id).await?;
    }
    let session = MeditationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meditation",
            id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/meditation/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MeditationRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Meditation",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/meditation/sleep
pub async fn create_sleep_content(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateSleepContent>,
) -> AppResult<impl IntoResponse> {
    require_title(&input.title)?;
    validate_sleep_kind(&input.kind)?;
    validate_catalog_duration(input.duration_secs)?;
    let item = SleepContentRepo::create(&state.pool, &input).await?;
    tracing::info!(sleep_content_id = item.id, user_id = admin.user_id, "Sleep content created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/meditation/sleep/{id}
pub async fn update_sleep_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSleepContent>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_title(title)?;
    }
    if let Some(kind) = &input.kind {
        validate_sleep_kind(kind)?;
    }
    if let Some(secs) = input.duration_secs {
        validate_catalog_duration(secs)?;
    }
    let item = SleepContentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SleepContent",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/meditation/sleep/{id}
pub async fn get_sleep_content(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = SleepContentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SleepContent",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/meditation/sleep/{id}
pub async fn delete_sleep_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SleepContentRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SleepContent",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_course_exists(state: &AppState, course_id: DbId) -> AppResult<()> {
    MeditationCourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MeditationCourse",
            id: course_id,
        }))
}

// ---------------------------------------------------------------------------
// Custom meditations
// ---------------------------------------------------------------------------

/// POST /api/v1/meditation/custom/generate
///
/// Ask the AI for a guided script and save it. A fallback script is saved
/// too, flagged with `fallback: true`.
pub async fn generate_custom(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<GenerateMeditationRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_ai_configured(&state)?;

    let request = MeditationRequest {
        mood: input.mood.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        focus: input.focus.map(|f| f.trim().to_string()).filter(|f| !f.is_empty()),
        duration_mins: input.duration_mins,
    };
    let outcome = state.ai.meditation_guidance(&request).await?;
    let guidance = outcome.result;

    let meditation = CustomMeditationRepo::create(
        &state.pool,
        auth.user_id,
        &CreateCustomMeditation {
            title: guidance.title,
            intention: Some(guidance.intention).filter(|i| !i.is_empty()),
            mood: request.mood,
            duration_mins: request.duration_mins,
            script: guidance.script,
            steps: guidance.steps,
            breathing_pattern: guidance.breathing_pattern,
        },
    )
    .await?;

    tracing::info!(
        custom_meditation_id = meditation.id,
        user_id = auth.user_id,
        fallback = outcome.fallback,
        "Custom meditation generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: GeneratedMeditation {
                meditation,
                fallback: outcome.fallback,
            },
        }),
    ))
}

/// GET /api/v1/meditation/custom?limit=
pub async fn list_custom(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = rats_db::clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let items = CustomMeditationRepo::list_for_user(&state.pool, auth.user_id, limit).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/meditation/custom/{id}
pub async fn get_custom(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = CustomMeditationRepo::find_for_user(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CustomMeditation",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/meditation/custom/{id}
pub async fn delete_custom(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CustomMeditationRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CustomMeditation",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// POST /api/v1/meditation/progress
///
/// Record a completed session. It may reference a catalog meditation or one
/// of the caller's custom meditations, not both.
pub async fn record_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<RecordProgressRequest>,
) -> AppResult<impl IntoResponse> {
    if !(MIN_SESSION_SECS..=MAX_SESSION_SECS).contains(&input.duration_secs) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "duration_secs must be between {MIN_SESSION_SECS} and {MAX_SESSION_SECS}"
        ))));
    }
    if input.meditation_id.is_some() && input.custom_meditation_id.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "Provide meditation_id or custom_meditation_id, not both".into(),
        )));
    }
    if let Some(completed_at) = input.completed_at {
        if completed_at > Utc::now() + Duration::minutes(5) {
            return Err(AppError::Core(CoreError::Validation(
                "completed_at must not be in the future".into(),
            )));
        }
    }

    if let Some(id) = input.meditation_id {
        MeditationRepo::find_by_id(&state.pool, id, auth.is_admin())
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Meditation",
                id,
            }))?;
    }
    if let Some(id) = input.custom_meditation_id {
        CustomMeditationRepo::find_for_user(&state.pool, auth.user_id, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "CustomMeditation",
                id,
            }))?;
    }

    let progress = MeditationProgressRepo::create(
        &state.pool,
        auth.user_id,
        &CreateMeditationProgress {
            meditation_id: input.meditation_id,
            custom_meditation_id: input.custom_meditation_id,
            duration_secs: input.duration_secs,
            completed_at: input.completed_at,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        duration_secs = progress.duration_secs,
        "Meditation progress recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: progress })))
}

/// GET /api/v1/meditation/progress?limit=
pub async fn list_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = rats_db::clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let items = MeditationProgressRepo::list_recent(&state.pool, auth.user_id, limit).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/meditation/progress/stats?days=
///
/// Totals and heatmap cover the trailing window ending today; the longest
/// streak is all-time.
pub async fn progress_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let days = clamp_stats_days(params.days);
    let to = today_utc();
    let from = to - Duration::days(days - 1);

    let (rows, dates) = tokio::try_join!(
        MeditationProgressRepo::daily_practice(&state.pool, auth.user_id, from, to),
        MeditationProgressRepo::practice_dates(&state.pool, auth.user_id),
    )?;

    let practice: Vec<DailyPractice> = rows
        .iter()
        .map(|r| DailyPractice {
            date: r.day,
            minutes: secs_to_minutes(r.total_secs),
            sessions: r.sessions,
        })
        .collect();

    let total_secs: i64 = rows.iter().map(|r| r.total_secs).sum();
    let total_sessions: i64 = rows.iter().map(|r| r.sessions).sum();

    Ok(Json(DataResponse {
        data: ProgressStats {
            from,
            to,
            total_minutes: secs_to_minutes(total_secs),
            total_sessions,
            current_streak: current_streak(&dates, to),
            longest_streak: longest_streak(&dates),
            heatmap: heatmap(&practice, from, to),
        },
    }))
}
