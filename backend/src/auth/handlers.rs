//! Handler functions for authentication-related API endpoints.
//!
//! These functions decode the request body, call `auth::service` and wrap
//! the outcome in the standard response envelope.

use crate::api::AppState;
use crate::api::common::{ApiError, ApiResponse, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(&state.pool, &state.jwt_utils, state.password_cost)
}

/// Handle registration request
#[axum::debug_handler]
pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<AuthResponse>>), ApiError> {
    match auth_service(&state).register(payload).await {
        Ok(response) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(response, "Account created successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<AuthResponse>>, ApiError> {
    match auth_service(&state).login(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Logged in successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<ApiResponse<TokensResponse>>, ApiError> {
    match auth_service(&state).refresh(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::ok(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request, revoking every refresh token of the caller
#[axum::debug_handler]
pub async fn logout(
    Extension(state): Extension<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    auth_service(&state)
        .logout(claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(StatusCode::NO_CONTENT)
}
