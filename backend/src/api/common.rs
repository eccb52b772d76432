//! Error handling utilities for API responses.
//!
//! Provides structured error responses and conversion between service-layer errors
//! and HTTP responses. Includes:
//! - Standard response envelope
//! - ServiceError to HTTP status code mapping
//! - Pagination support for list endpoints
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `message`: Human-readable message
//! - `error.error_type`: Machine-readable error category
//! - `error.details`: Optional field-specific validation errors
//!
//! Paginated responses include:
//! - `pagination`: Metadata about current page, total items, etc.
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `service_error_to_http` converts to appropriate HTTP response
//! 3. Infrastructure failures are logged here and collapsed to a generic message

use crate::errors::ServiceError;
use axum::{Json, http::StatusCode};
use serde::{Deserialize, Deserializer, Serialize};

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Pagination metadata (present for paginated responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    /// Response timestamp
    pub timestamp: String,
}

/// Error half of a handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Pagination metadata for list responses
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (1-indexed)
    pub current_page: u32,
    /// Number of items per page
    pub per_page: u32,
    /// Total number of items across all pages
    pub total_items: u64,
    /// Total number of pages
    pub total_pages: u32,
    /// Whether there is a next page
    pub has_next: bool,
    /// Whether there is a previous page
    pub has_prev: bool,
    /// Next page number (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    /// Previous page number (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u32>,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

/// Pagination parameters for requests.
///
/// Out-of-range or non-numeric values fall back to the defaults instead of
/// failing the request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaginationFilter {
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub page: Option<i64>,
    /// Number of items per page
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub limit: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Reads a query value as a number, treating anything unparsable as absent.
fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt_string: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt_string.and_then(|s| s.trim().parse().ok()))
}

// ============================================================================
// Implementation Details
// ============================================================================

impl PaginationMeta {
    /// Create pagination metadata from page parameters and total count
    pub fn new(current_page: u32, per_page: u32, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            ((total_items - 1) / per_page as u64 + 1) as u32
        };

        let has_next = current_page < total_pages;
        let has_prev = current_page > 1;

        Self {
            current_page,
            per_page,
            total_items,
            total_pages,
            has_next,
            has_prev,
            next_page: if has_next {
                Some(current_page + 1)
            } else {
                None
            },
            prev_page: if has_prev {
                Some(current_page - 1)
            } else {
                None
            },
        }
    }

    pub fn from_filter(filter: &PaginationFilter, total_items: u64) -> Self {
        Self::new(filter.page(), filter.per_page(), total_items)
    }
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            pagination: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response with default message
    pub fn ok(data: T) -> Self {
        Self::success(data, "Request successful")
    }

    /// Create a successful paginated response with default message
    pub fn ok_paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            pagination: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl PaginationFilter {
    /// Page number; anything below 1 becomes 1
    pub fn page(&self) -> u32 {
        match self.page {
            Some(page) if page >= 1 => page.min(u32::MAX as i64) as u32,
            _ => 1,
        }
    }

    /// Page size; anything outside 1..=100 becomes the default
    pub fn per_page(&self) -> u32 {
        match self.limit {
            Some(limit) if (1..=MAX_PAGE_SIZE as i64).contains(&limit) => limit as u32,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Calculate offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page() as i64 - 1) * self.per_page() as i64
    }

    /// Get limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page() as i64
    }
}

/// Builds an error response with the given status.
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error_type: &str,
) -> ApiError {
    (status, Json(ApiResponse::<()>::error(message, error_type, None)))
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    let (status, error_type, message) = match error {
        ServiceError::Validation { message, fields } => {
            let details = (!fields.is_empty()).then(|| {
                fields
                    .into_iter()
                    .map(|(field, message)| FieldError { field, message })
                    .collect()
            });
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(message, "validation_error", details)),
            );
        }
        ServiceError::Unauthorized { message } => {
            (StatusCode::UNAUTHORIZED, "unauthorized", message)
        }
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
        ),
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::CONFLICT,
            "already_exists",
            format!("{} '{}' already exists", entity, identifier),
        ),
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    error_response(status, message, error_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta_calculation() {
        // Test normal pagination
        let meta = PaginationMeta::new(2, 10, 25);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.per_page, 10);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
        assert_eq!(meta.next_page, Some(3));
        assert_eq!(meta.prev_page, Some(1));

        // Test first page
        let meta = PaginationMeta::new(1, 10, 25);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
        assert_eq!(meta.prev_page, None);
        assert_eq!(meta.next_page, Some(2));

        // Test last page
        let meta = PaginationMeta::new(3, 10, 25);
        assert!(meta.has_prev);
        assert!(!meta.has_next);
        assert_eq!(meta.prev_page, Some(2));
        assert_eq!(meta.next_page, None);

        // Test empty result set
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_pagination_filter() {
        let filter = PaginationFilter {
            page: Some(2),
            limit: Some(50),
        };
        assert_eq!(filter.page(), 2);
        assert_eq!(filter.per_page(), 50);
        assert_eq!(filter.offset(), 50);
        assert_eq!(filter.limit(), 50);
    }

    #[test]
    fn test_pagination_filter_clamps_out_of_range_values() {
        let filter = PaginationFilter {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);

        let filter = PaginationFilter {
            page: Some(-3),
            limit: Some(0),
        };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);

        let filter = PaginationFilter::default();
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_pagination_filter_ignores_non_numeric_values() {
        let filter: PaginationFilter =
            serde_json::from_str(r#"{"page":"abc","limit":" 5 "}"#).unwrap();
        assert_eq!(filter.page, None);
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.per_page(), 5);

        let filter: PaginationFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.per_page(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_infrastructure_errors_are_opaque() {
        let (status, Json(body)) = service_error_to_http(ServiceError::Database {
            source: anyhow::anyhow!("no such table: users"),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error.unwrap().error_type, "database_error");

        let (status, Json(body)) =
            service_error_to_http(ServiceError::internal_error("signing key missing"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal server error");
    }

    #[test]
    fn test_validation_errors_carry_field_details() {
        let (status, Json(body)) =
            service_error_to_http(ServiceError::invalid_field("markers", "duplicate marker id 'm1'"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "markers: duplicate marker id 'm1'");

        let error = body.error.unwrap();
        assert_eq!(error.error_type, "validation_error");
        let details = error.details.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "markers");
        assert_eq!(details[0].message, "duplicate marker id 'm1'");

        let (_, Json(body)) = service_error_to_http(ServiceError::validation("bad"));
        assert!(body.error.unwrap().details.is_none());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (ServiceError::unauthorized("no"), StatusCode::UNAUTHORIZED),
            (ServiceError::not_found("Project", "p1"), StatusCode::NOT_FOUND),
            (ServiceError::already_exists("Account", "a@x.com"), StatusCode::CONFLICT),
        ];
        for (error, expected) in cases {
            assert_eq!(service_error_to_http(error).0, expected);
        }
    }
}
