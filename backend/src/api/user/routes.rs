//! Defines the HTTP routes for the user profile.
//!
//! These routes provide endpoints for reading and updating the caller's own
//! profile and preferences.

use super::handlers::{get_me, update_me};
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn user_router() -> Router {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route_layer(middleware::from_fn(jwt_auth))
}
