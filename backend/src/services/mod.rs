//! Module for core business logic services.
//!
//! Each service borrows the shared pool and scopes every operation by the
//! authenticated user id handed in from the HTTP layer.

pub mod progress_service;
pub mod project_service;
pub mod token_cleanup;
pub mod upload_service;
pub mod user_service;
