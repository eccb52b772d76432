//! Module for the authenticated user's profile endpoints.

pub mod handlers;
pub mod routes;
