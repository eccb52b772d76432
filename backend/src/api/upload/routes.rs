//! Defines the HTTP routes for image uploads.

use super::handlers::presign_upload;
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::post};

pub fn upload_router() -> Router {
    Router::new()
        .route("/presign", post(presign_upload))
        .route_layer(middleware::from_fn(jwt_auth))
}
