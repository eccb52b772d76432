//! Defines the HTTP routes specifically for authentication.
//!
//! Register, login and refresh are public; logout needs a valid access token.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{delete, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route(
            "/logout",
            delete(logout).layer(middleware::from_fn(jwt_auth)),
        )
}
