//! Data access layer.
//!
//! Each repository wraps the parameterized SQL for one table family and
//! returns `anyhow::Result` with context attached; services translate those
//! into `ServiceError`s.

pub mod progress_repository;
pub mod project_repository;
pub mod refresh_token_repository;
pub mod user_repository;

/// True when `error` wraps a unique-constraint violation from the store.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
