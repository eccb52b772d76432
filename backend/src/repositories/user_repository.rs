//! Database repository for user management operations.
//!
//! Provides account creation and lookup for the session service, and the
//! profile/preference reads and writes behind `/users/me`.

use crate::database::models::{CreateUser, UpdateProfile, User, UserProfile};
use anyhow::{Context, Result};
use sqlx::{SqliteExecutor, SqlitePool};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user.
    ///
    /// Takes any executor so registration can run it inside the same
    /// transaction that stores the first refresh token. A duplicate email
    /// surfaces as a unique violation (see `repositories::is_unique_violation`).
    pub async fn create_user<'e, E>(executor: E, user: &CreateUser) -> Result<User>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.created_at)
        .execute(executor)
        .await
        .context("Failed to insert user")?;

        Ok(User {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
        })
    }

    /// Retrieves a user by exact email match.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(user)
    }

    /// Retrieves a profile with unset preferences filled with their defaults.
    pub async fn get_profile(&self, id: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, name, created_at,
                   COALESCE(pref_nail_style, 'top_mounted') AS default_nail_style,
                   COALESCE(pref_nail_diameter_mm, 1.5) AS default_nail_diameter_mm,
                   COALESCE(pref_units, 'metric') AS units,
                   COALESCE(pref_auto_save, 1) AS auto_save_progress,
                   COALESCE(pref_haptic, 0) AS haptic_feedback
            FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user profile")?;

        Ok(profile)
    }

    /// Applies the supplied fields only; absent fields keep their value.
    ///
    /// # Returns
    /// `true` if the user exists
    pub async fn update_profile(&self, id: &str, update: &UpdateProfile) -> Result<bool> {
        let prefs = update.preferences.clone().unwrap_or_default();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                pref_nail_style = COALESCE(?, pref_nail_style),
                pref_nail_diameter_mm = COALESCE(?, pref_nail_diameter_mm),
                pref_units = COALESCE(?, pref_units),
                pref_auto_save = COALESCE(?, pref_auto_save),
                pref_haptic = COALESCE(?, pref_haptic)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(prefs.default_nail_style)
        .bind(prefs.default_nail_diameter_mm)
        .bind(prefs.units)
        .bind(prefs.auto_save_progress)
        .bind(prefs.haptic_feedback)
        .bind(id)
        .execute(self.pool)
        .await
        .context("Failed to update user profile")?;

        Ok(result.rows_affected() > 0)
    }
}
