//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models,
//! e.g. `User` carries the password hash and is never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Account row including the stored password credential.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Server-side refresh token record. The token string is the primary key.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Account profile as exposed through `/users/me`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Preferences {
    pub default_nail_style: String,
    pub default_nail_diameter_mm: f64,
    pub units: String,
    pub auto_save_progress: bool,
    pub haptic_feedback: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,
    #[validate(nested)]
    pub preferences: Option<UpdatePreferences>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePreferences {
    #[validate(length(min = 1, message = "Nail style must not be empty"))]
    pub default_nail_style: Option<String>,
    #[validate(range(min = 0.0, message = "Nail diameter must not be negative"))]
    pub default_nail_diameter_mm: Option<f64>,
    #[validate(length(min = 1, message = "Units must not be empty"))]
    pub units: Option<String>,
    pub auto_save_progress: Option<bool>,
    pub haptic_feedback: Option<bool>,
}

/// A saved string-art plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub shape: String,
    pub size_inches: f64,
    pub nail_count: i64,
    pub nail_style: String,
    pub nail_diameter_mm: f64,
    pub layer_mode: bool,
    pub layer_count: i64,
    pub image_remote_url: String,
    pub string_plan_json: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateProject {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,
    pub shape: String,
    #[validate(range(min = 0.0, message = "Size must not be negative"))]
    pub size_inches: f64,
    #[validate(range(min = 0, message = "Nail count must not be negative"))]
    pub nail_count: i64,
    pub nail_style: String,
    #[validate(range(min = 0.0, message = "Nail diameter must not be negative"))]
    pub nail_diameter_mm: f64,
    pub layer_mode: bool,
    #[validate(range(min = 0, message = "Layer count must not be negative"))]
    pub layer_count: i64,
    pub image_remote_url: String,
    pub string_plan_json: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub shape: Option<String>,
    #[validate(range(min = 0.0, message = "Size must not be negative"))]
    pub size_inches: Option<f64>,
    #[validate(range(min = 0, message = "Nail count must not be negative"))]
    pub nail_count: Option<i64>,
    pub nail_style: Option<String>,
    #[validate(range(min = 0.0, message = "Nail diameter must not be negative"))]
    pub nail_diameter_mm: Option<f64>,
    pub layer_mode: Option<bool>,
    #[validate(range(min = 0, message = "Layer count must not be negative"))]
    pub layer_count: Option<i64>,
    pub image_remote_url: Option<String>,
    pub string_plan_json: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProgressRow {
    pub current_step: i64,
    pub total_steps: i64,
    pub last_updated: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Marker {
    pub id: String,
    pub step: i64,
    pub label: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Progress through a project's stringing steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub project_id: String,
    pub current_step: i64,
    pub total_steps: i64,
    pub last_updated: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProgress {
    #[serde(default)]
    #[validate(range(min = 0, message = "Current step must not be negative"))]
    pub current_step: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Total steps must not be negative"))]
    pub total_steps: i64,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(nested)]
    pub markers: Vec<MarkerInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MarkerInput {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(range(min = 0, message = "Marker step must not be negative"))]
    pub step: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
