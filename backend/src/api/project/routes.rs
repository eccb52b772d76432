//! Defines the HTTP routes for projects.
//!
//! Every route is scoped to the authenticated user's own projects.

use super::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn project_router() -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/{id}/export", get(export_project))
        .route("/{id}/progress", get(get_progress).put(put_progress))
        .route_layer(middleware::from_fn(jwt_auth))
}
