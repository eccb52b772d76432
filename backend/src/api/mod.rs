//! Central module for organizing the application's API endpoints.
//!
//! Builds the full router: `/health` plus the versioned `/v1` surface. The
//! shared `AppState` is attached as an `Extension` layer so every handler and
//! the auth middleware can reach it.

pub mod common;
pub mod project;
pub mod upload;
pub mod user;

use crate::auth;
use crate::services::upload_service::UploadSigner;
use crate::utils::jwt::JwtUtils;
use axum::{Extension, Json, Router, routing::get};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Immutable, cheaply cloneable state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_utils: Arc<JwtUtils>,
    /// bcrypt cost for new password hashes
    pub password_cost: u32,
    pub upload_signer: Arc<dyn UploadSigner>,
    /// Public base URL uploaded objects are served from
    pub public_url: String,
}

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .nest("/auth", auth::routes::auth_router())
        .nest("/users", user::routes::user_router())
        .nest("/projects", project::routes::project_router())
        .nest("/uploads", upload::routes::upload_router());

    Router::new()
        .route("/health", get(health))
        .nest("/v1", v1)
        .layer(Extension(state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{TEST_COST, test_pool};
    use crate::services::upload_service::tests::RecordingSigner;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    async fn app() -> Router {
        router(AppState {
            pool: test_pool().await,
            jwt_utils: Arc::new(JwtUtils::new(SECRET).unwrap()),
            password_cost: TEST_COST,
            upload_signer: Arc::new(RecordingSigner::default()),
            public_url: "https://pub.example.dev".to_string(),
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Registers an account and returns (access token, refresh token).
    async fn register(app: &Router, email: &str) -> (String, String) {
        let (status, body) = send(
            app,
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({ "email": email, "password": "pw1", "name": "Ann" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let tokens = &body["data"]["tokens"];
        (
            tokens["access_token"].as_str().unwrap().to_string(),
            tokens["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_session_lifecycle_over_http() {
        let app = app().await;
        let (access, refresh) = register(&app, "a@x.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "pw1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["email"], "a@x.com");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["data"]["tokens"]["refresh_token"], json!(refresh));

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid or expired refresh token");

        let (status, _) = send(&app, Method::DELETE, "/v1/auth/logout", Some(&access), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let app = app().await;
        register(&app, "a@x.com").await;

        let (wrong_status, wrong_body) = send(
            &app,
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "nope" })),
        )
        .await;
        let (unknown_status, unknown_body) = send(
            &app,
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "email": "ghost@x.com", "password": "pw1" })),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_status, unknown_status);
        assert_eq!(wrong_body["message"], unknown_body["message"]);
        assert_eq!(wrong_body["error"], unknown_body["error"]);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = app().await;
        register(&app, "a@x.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({ "email": "a@x.com", "password": "pw2", "name": "Other" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["error_type"], "already_exists");
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_valid_token() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/v1/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "missing token");

        let (status, body) =
            send(&app, Method::GET, "/v1/projects", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid token");

        let (status, _) = send(&app, Method::DELETE, "/v1/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_and_preferences() {
        let app = app().await;
        let (access, _) = register(&app, "a@x.com").await;

        let (status, body) = send(&app, Method::GET, "/v1/users/me", Some(&access), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["preferences"]["units"], "metric");

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/v1/users/me",
            Some(&access),
            Some(json!({ "preferences": { "default_nail_diameter_mm": 2.0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["preferences"]["default_nail_diameter_mm"], 2.0);
        assert_eq!(body["data"]["name"], "Ann");
    }

    #[tokio::test]
    async fn test_project_crud_progress_and_export() {
        let app = app().await;
        let (owner, _) = register(&app, "a@x.com").await;
        let (other, _) = register(&app, "b@x.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/projects",
            Some(&owner),
            Some(json!({ "title": "Sunset", "shape": "circle", "string_plan_json": "[1,2]" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let path = format!("/v1/projects/{}", id);

        let (status, body) =
            send(&app, Method::GET, "/v1/projects?page=0&limit=500", Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["current_page"], 1);
        assert_eq!(body["pagination"]["per_page"], 20);
        assert_eq!(body["pagination"]["total_items"], 1);

        let (status, _) = send(&app, Method::GET, &path, Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &path,
            Some(&owner),
            Some(json!({ "status": "in_progress" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "in_progress");
        assert_eq!(body["data"]["title"], "Sunset");

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("{}/export?format=json", path),
            Some(&owner),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], "[1,2]");

        let progress_path = format!("{}/progress", path);
        let (status, _) = send(
            &app,
            Method::PUT,
            &progress_path,
            Some(&other),
            Some(json!({ "current_step": 1, "total_steps": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::PUT,
            &progress_path,
            Some(&owner),
            Some(json!({
                "current_step": 4,
                "total_steps": 10,
                "markers": [{ "step": 4, "label": "halfway" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["current_step"], 4);
        assert_eq!(body["data"]["markers"][0]["label"], "halfway");

        let (status, _) = send(&app, Method::DELETE, &path, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &path, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_non_numeric_pagination_falls_back_to_defaults() {
        let app = app().await;
        let (access, _) = register(&app, "a@x.com").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/v1/projects?page=abc&limit=xyz",
            Some(&access),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["current_page"], 1);
        assert_eq!(body["pagination"]["per_page"], 20);
    }

    #[tokio::test]
    async fn test_repeated_marker_id_is_a_field_error() {
        let app = app().await;
        let (access, _) = register(&app, "a@x.com").await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/v1/projects",
            Some(&access),
            Some(json!({ "title": "Sunset" })),
        )
        .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/v1/projects/{}/progress", id),
            Some(&access),
            Some(json!({
                "current_step": 1,
                "total_steps": 2,
                "markers": [
                    { "id": "dup", "step": 1 },
                    { "id": "dup", "step": 2 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["error_type"], "validation_error");
        assert_eq!(body["error"]["details"][0]["field"], "markers");
    }

    #[tokio::test]
    async fn test_presign_defaults_content_type() {
        let app = app().await;
        let (access, _) = register(&app, "a@x.com").await;

        let (status, body) =
            send(&app, Method::POST, "/v1/uploads/presign", Some(&access), None).await;
        assert_eq!(status, StatusCode::OK);
        let key = body["data"]["key"].as_str().unwrap();
        assert!(key.starts_with("https://pub.example.dev/users/"));
        assert!(body["data"]["url"].as_str().unwrap().contains("/images/"));
    }
}
