//! Handler functions for image upload API endpoints.

use crate::api::AppState;
use crate::api::common::{ApiError, ApiResponse, service_error_to_http};
use crate::services::upload_service::{PresignResult, UploadService};
use crate::utils::jwt::Claims;
use axum::{
    body::Bytes,
    extract::{Extension, Json},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PresignRequest {
    #[serde(default)]
    pub content_type: String,
}

/// Hands out a presigned PUT URL under the caller's key prefix.
///
/// The body is optional; a missing or unreadable one means `image/jpeg`.
#[axum::debug_handler]
pub async fn presign_upload(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<PresignResult>>, ApiError> {
    let request: PresignRequest = serde_json::from_slice(&body).unwrap_or_default();

    let result = UploadService::new(state.upload_signer.as_ref(), &state.public_url)
        .presign(claims.user_id(), &request.content_type)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(result)))
}
