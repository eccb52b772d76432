//! Refresh token persistence.
//!
//! Tokens are stored verbatim (the token string is the primary key) with an
//! expiry in unix seconds. A token is usable only while its row exists and
//! `expires_at` is in the future; consuming it deletes the row.

use crate::database::models::RefreshToken;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

pub struct RefreshTokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RefreshTokenRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a refresh token.
    ///
    /// An insert that collides with an existing token is a no-op.
    ///
    /// # Returns
    /// `true` if the row was written
    pub async fn create<'e, E>(executor: E, token: &RefreshToken) -> Result<bool>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(&token.token)
        .bind(&token.user_id)
        .bind(token.expires_at.timestamp())
        .execute(executor)
        .await
        .context("Failed to store refresh token")?;

        Ok(result.rows_affected() == 1)
    }

    /// Atomically deletes an unexpired token and returns its owner.
    ///
    /// Lookup and deletion are one statement, so when the same token is
    /// presented twice concurrently only one caller gets `Some`.
    pub async fn consume(&self, token: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let user_id = sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM refresh_tokens
            WHERE token = ? AND expires_at > ?
            RETURNING user_id
            "#,
        )
        .bind(token)
        .bind(now.timestamp())
        .fetch_optional(self.pool)
        .await
        .context("Failed to consume refresh token")?;

        Ok(user_id)
    }

    /// Revokes every refresh token of a user (logout from all devices).
    pub async fn delete_all_for_user(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await
            .context("Failed to revoke refresh tokens for user")?;

        Ok(result.rows_affected())
    }

    /// Deletes rows whose expiry has passed (cleanup only).
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(now.timestamp())
            .execute(self.pool)
            .await
            .context("Failed to delete expired refresh tokens")?;

        Ok(result.rows_affected())
    }
}
