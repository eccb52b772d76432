//! Handler functions for user profile API endpoints.
//!
//! These functions read and update the profile of the user identified by the
//! validated access token.

use crate::api::AppState;
use crate::api::common::{ApiError, ApiResponse, service_error_to_http};
use crate::database::models::{UpdateProfile, UserProfile};
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::extract::{Extension, Json};

/// Retrieves the caller's profile and preferences.
#[axum::debug_handler]
pub async fn get_me(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = UserService::new(&state.pool)
        .get_profile(claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        profile,
        "User retrieved successfully",
    )))
}

/// Updates the caller's name and/or preferences.
#[axum::debug_handler]
pub async fn update_me(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    tracing::info!("Updating profile for user: {}", claims.user_id());

    let profile = UserService::new(&state.pool)
        .update_profile(claims.user_id(), payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(
        profile,
        "User updated successfully",
    )))
}
