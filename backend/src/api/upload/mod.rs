//! Module for presigned image upload endpoints.

pub mod handlers;
pub mod routes;
