//! Handler functions for project API endpoints.

use crate::api::AppState;
use crate::api::common::{
    ApiError, ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http,
};
use crate::database::models::{CreateProject, Progress, Project, UpdateProgress, UpdateProject};
use crate::services::progress_service::ProgressService;
use crate::services::project_service::{ExportContent, ExportFormat, ProjectService};
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Lists the caller's projects, most recently updated first.
#[axum::debug_handler]
pub async fn list_projects(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Query(pagination): Query<PaginationFilter>,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let (projects, total) = ProjectService::new(&state.pool)
        .list(claims.user_id(), &pagination)
        .await
        .map_err(service_error_to_http)?;

    let meta = PaginationMeta::from_filter(&pagination, total);
    Ok(Json(ApiResponse::ok_paginated(projects, meta)))
}

#[axum::debug_handler]
pub async fn create_project(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    let project = ProjectService::new(&state.pool)
        .create(claims.user_id(), payload)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(project, "Project created successfully")),
    ))
}

#[axum::debug_handler]
pub async fn get_project(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = ProjectService::new(&state.pool)
        .get(&id, claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(project)))
}

#[axum::debug_handler]
pub async fn update_project(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProject>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = ProjectService::new(&state.pool)
        .update(&id, claims.user_id(), payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(project, "Project updated successfully")))
}

/// Deletes a project; deleting one that is already gone still succeeds.
#[axum::debug_handler]
pub async fn delete_project(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ProjectService::new(&state.pool)
        .delete(&id, claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn export_project(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ApiResponse<ExportContent>>, ApiError> {
    let format = ExportFormat::parse(query.format.as_deref());

    let export = ProjectService::new(&state.pool)
        .export(&id, claims.user_id(), format)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(export)))
}

#[axum::debug_handler]
pub async fn get_progress(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Progress>>, ApiError> {
    let progress = ProgressService::new(&state.pool)
        .get(&id, claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(progress)))
}

#[axum::debug_handler]
pub async fn put_progress(
    Extension(claims): Extension<Claims>,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProgress>,
) -> Result<Json<ApiResponse<Progress>>, ApiError> {
    let progress = ProgressService::new(&state.pool)
        .put(&id, claims.user_id(), payload)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::success(progress, "Progress saved successfully")))
}
