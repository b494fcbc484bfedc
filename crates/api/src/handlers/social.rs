//! Handlers for linked social accounts and social media posts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use rats_core::error::CoreError;
use rats_core::social::{
    validate_post_content, SocialPlatform, POST_CANCELLED, POST_FAILED, POST_POSTED,
    POST_PUBLISHING, POST_SCHEDULED,
};
use rats_core::types::{DbId, Timestamp};
use rats_db::models::social::{CreateSocialPost, SocialAccountResponse, UpsertSocialAccount};
use rats_db::repositories::{EventRepo, SocialAccountRepo, SocialPostRepo};
use serde::{Deserialize, Serialize};

use crate::auth::oauth_state::{pkce_verifier, sign_state, verify_state};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

/// How far ahead a post may be scheduled.
const MAX_SCHEDULE_AHEAD_DAYS: i64 = 365;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub authorization_url: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub platform: String,
    pub content: String,
    /// Omit to publish on the next dispatcher tick.
    pub scheduled_for: Option<Timestamp>,
    pub event_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn parse_platform(platform: &str) -> Result<SocialPlatform, CoreError> {
    SocialPlatform::parse(platform)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// GET /api/v1/social/accounts
///
/// Linked accounts without their tokens.
pub async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let accounts = SocialAccountRepo::list_for_user(&state.pool, auth.user_id).await?;
    let data: Vec<SocialAccountResponse> = accounts.iter().map(SocialAccountResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/social/{platform}/connect
///
/// Start linking: returns the platform's authorization URL with a signed state.
pub async fn connect(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(platform): Path<String>,
) -> AppResult<impl IntoResponse> {
    let platform = parse_platform(&platform)?;
    let secret = &state.config.jwt.secret;

    let oauth_state = sign_state(secret, auth.user_id, platform, Utc::now());
    let challenge = (platform == SocialPlatform::Twitter).then(|| pkce_verifier(secret, &oauth_state));
    let authorization_url =
        state
            .social
            .oauth
            .authorization_url(platform, &oauth_state, challenge.as_deref())?;

    tracing::debug!(user_id = auth.user_id, %platform, "OAuth link started");
    Ok(Json(DataResponse {
        data: ConnectResponse {
            authorization_url,
            state: oauth_state,
        },
    }))
}

/// POST /api/v1/social/{platform}/callback
///
/// Finish linking: verify the state, exchange the code, look up the account
/// and store its tokens encrypted. Re-linking replaces the stored tokens.
pub async fn callback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(platform): Path<String>,
    Json(input): Json<CallbackRequest>,
) -> AppResult<impl IntoResponse> {
    let platform = parse_platform(&platform)?;
    let secret = &state.config.jwt.secret;
    let now = Utc::now();

    let state_user = verify_state(secret, &input.state, platform, now)?;
    if state_user != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "OAuth state belongs to another user".into(),
        )));
    }
    if input.code.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Authorization code must not be empty".into(),
        )));
    }

    let verifier = (platform == SocialPlatform::Twitter).then(|| pkce_verifier(secret, &input.state));
    let oauth = &state.social.oauth;
    let tokens = oauth
        .exchange_code(platform, input.code.trim(), verifier.as_deref())
        .await?;
    let identity = oauth.fetch_identity(platform, &tokens.access_token).await?;

    let cipher = &state.social.cipher;
    let account = SocialAccountRepo::upsert(
        &state.pool,
        auth.user_id,
        &UpsertSocialAccount {
            platform: platform.as_str().to_string(),
            external_account_id: identity.external_account_id,
            handle: identity.handle,
            access_token: cipher.encrypt(&tokens.access_token)?,
            refresh_token: tokens
                .refresh_token
                .as_deref()
                .map(|t| cipher.encrypt(t))
                .transpose()?,
            token_expires_at: tokens.expires_at(now),
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, %platform, account_id = account.id, "Social account linked");
    Ok(Json(DataResponse {
        data: SocialAccountResponse::from(&account),
    }))
}

/// DELETE /api/v1/social/{platform}
///
/// Idempotent: unlinking a platform that is not linked also gives 204.
pub async fn unlink(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(platform): Path<String>,
) -> AppResult<StatusCode> {
    let platform = parse_platform(&platform)?;
    let removed = SocialAccountRepo::delete(&state.pool, auth.user_id, platform.as_str()).await?;
    tracing::info!(user_id = auth.user_id, %platform, removed, "Social account unlinked");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /api/v1/social/posts?status=&limit=&offset=
pub async fn list_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListPostsParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        rats_core::error::validate_known_value(
            status,
            &[
                POST_SCHEDULED,
                POST_PUBLISHING,
                POST_POSTED,
                POST_FAILED,
                POST_CANCELLED,
            ],
            "status",
        )?;
    }
    let limit = rats_db::clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = rats_db::clamp_offset(params.offset);
    let posts = SocialPostRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/social/posts
///
/// Queue a post for a linked account, immediately or at `scheduled_for`.
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let platform = parse_platform(&input.platform)?;
    validate_post_content(platform, &input.content)?;

    let now = Utc::now();
    let scheduled_for = input.scheduled_for.unwrap_or(now);
    if scheduled_for > now + Duration::days(MAX_SCHEDULE_AHEAD_DAYS) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "scheduled_for must be within {MAX_SCHEDULE_AHEAD_DAYS} days"
        ))));
    }

    if SocialAccountRepo::find_for_user_platform(&state.pool, auth.user_id, platform.as_str())
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "No {platform} account is linked"
        ))));
    }
    if let Some(event_id) = input.event_id {
        EventRepo::find_for_user(&state.pool, auth.user_id, event_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Event",
                id: event_id,
            }))?;
    }

    let post = SocialPostRepo::create(
        &state.pool,
        auth.user_id,
        &CreateSocialPost {
            event_id: input.event_id,
            platform: platform.as_str().to_string(),
            content: input.content,
            scheduled_for: scheduled_for.max(now),
        },
    )
    .await?;

    tracing::info!(post_id = post.id, user_id = auth.user_id, %platform, "Social post scheduled");
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// DELETE /api/v1/social/posts/{id}
///
/// Cancel a scheduled post. Posts that already left `scheduled` give 409.
pub async fn cancel_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if let Some(post) = SocialPostRepo::cancel(&state.pool, auth.user_id, id).await? {
        tracing::info!(post_id = id, user_id = auth.user_id, "Social post cancelled");
        return Ok(Json(DataResponse { data: post }));
    }

    match SocialPostRepo::find_for_user(&state.pool, auth.user_id, id).await? {
        Some(post) => Err(AppError::Core(CoreError::Conflict(format!(
            "Post is already {}; only scheduled posts can be cancelled",
            post.status
        )))),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "SocialMediaPost",
            id,
        })),
    }
}
