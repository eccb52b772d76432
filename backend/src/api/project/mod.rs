//! Module for project, progress and export API endpoints.

pub mod handlers;
pub mod routes;
