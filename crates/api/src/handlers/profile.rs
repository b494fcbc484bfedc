//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use rats_core::error::CoreError;
use rats_db::models::user::{UpdateProfile, UserResponse};
use rats_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::find_user;
use crate::middleware::auth::AuthUser;
use crate::query::today_utc;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub display_name: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, auth.user_id).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, &role),
    }))
}

/// PUT /api/v1/profile
///
/// Only fields present in the body are changed.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    if let Some(dob) = input.date_of_birth {
        if dob > today_utc() {
            return Err(AppError::Core(CoreError::Validation(
                "date_of_birth must not be in the future".into(),
            )));
        }
    }

    let update = UpdateProfile {
        display_name: input.display_name.map(|n| n.trim().to_string()),
        avatar_url: input.avatar_url,
        bio: input.bio,
        date_of_birth: input.date_of_birth,
    };

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    tracing::info!(user_id = auth.user_id, "Profile updated");
    Ok(Json(DataResponse {
        data: UserResponse::from_user(&user, &role),
    }))
}

/// PUT /api/v1/profile/password
///
/// Verifies the current password, stores the new hash and signs out every
/// session. Returns 204.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)?;

    let user = find_user(&state, auth.user_id).await?;
    let valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, auth.user_id, &new_hash).await?;
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, revoked, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/profile
///
/// Deactivate the caller's account and revoke its sessions. Returns 204.
pub async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    if !UserRepo::deactivate(&state.pool, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "Account deactivated");
    Ok(StatusCode::NO_CONTENT)
}
