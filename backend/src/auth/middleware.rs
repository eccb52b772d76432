//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer access token and attaches its `Claims` to the request
//! so handlers can read the caller's identity with `Extension<Claims>`.

use crate::api::{
    AppState,
    common::{ApiError, service_error_to_http},
};
use crate::errors::ServiceError;
use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| service_error_to_http(ServiceError::unauthorized("missing token")))?;

    let claims = state
        .jwt_utils
        .validate_token(token)
        .map_err(service_error_to_http)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
