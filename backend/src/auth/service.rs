//! Core business logic for the authentication system.
//!
//! A session is an access token (stateless, signed, one hour) paired with an
//! opaque refresh token (stored, thirty days, single use). Refresh tokens are
//! rotated on every use and revoked all at once on logout.

use crate::auth::models::*;
use crate::database::models::{CreateUser, RefreshToken};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::is_unique_violation;
use crate::repositories::refresh_token_repository::RefreshTokenRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::generate_random_string::generate_random_string;
use crate::utils::jwt::JwtUtils;
use anyhow::Context;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;
use validator::Validate;

/// Lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

const REFRESH_TOKEN_LENGTH: usize = 64;

pub const INVALID_CREDENTIALS: &str = "invalid credentials";
pub const INVALID_REFRESH_TOKEN: &str = "invalid or expired refresh token";

/// Authentication service for registration, login and session management
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: &'a JwtUtils,
    password_cost: u32,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `jwt_utils` - Access token signer/validator
    /// * `password_cost` - bcrypt cost used for new password hashes
    pub fn new(pool: &'a SqlitePool, jwt_utils: &'a JwtUtils, password_cost: u32) -> Self {
        Self {
            pool,
            jwt_utils,
            password_cost,
        }
    }

    /// Creates an account and its first session.
    ///
    /// The account row and the refresh token are written in one transaction,
    /// so a failure at any step leaves no account behind.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - An email that is already registered (`AlreadyExists`)
    /// - Hashing, signing or storage failures
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let password_hash = self.hash_password(&request.password)?;

        let data = CreateUser {
            id: Uuid::now_v7().to_string(),
            email: request.email,
            name: request.name,
            password_hash,
            created_at: Utc::now(),
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin registration transaction")?;

        let user = match UserRepository::create_user(&mut *tx, &data).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(ServiceError::already_exists("Account", &data.email));
            }
            Err(e) => return Err(e.into()),
        };

        let tokens = self.issue_session_with(&mut *tx, &user.id).await?;

        tx.commit()
            .await
            .context("Failed to commit registration transaction")?;

        tracing::info!("Registered account {}", user.id);

        Ok(AuthResponse {
            user: user.into(),
            tokens,
        })
    }

    /// Authenticates by email and password and issues a new session.
    ///
    /// An unknown email, a wrong password and an unreadable stored hash all
    /// fail with the same `Unauthorized` error.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let repo = UserRepository::new(self.pool);
        let user = match repo.get_user_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                // Unknown emails still cost one bcrypt round.
                let _ = hash(&request.password, self.password_cost);
                tracing::warn!("Login failed: unknown email");
                return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        if !Self::verify_password(&request.password, &user.password_hash) {
            tracing::warn!("Login failed for account {}", user.id);
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self.issue_session(&user.id).await?;

        Ok(AuthResponse {
            user: user.into(),
            tokens,
        })
    }

    /// Consumes a refresh token and issues a brand-new session.
    ///
    /// The presented token is deleted before anything else happens. If
    /// issuing the new session then fails, the old token stays gone and the
    /// caller has to log in again.
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<TokensResponse> {
        request.validate()?;

        let repo = RefreshTokenRepository::new(self.pool);
        let user_id = repo
            .consume(&request.refresh_token, Utc::now())
            .await?
            .ok_or_else(|| {
                tracing::warn!("Refresh rejected: unknown, used or expired token");
                ServiceError::unauthorized(INVALID_REFRESH_TOKEN)
            })?;

        let tokens = self.issue_session(&user_id).await?;

        Ok(TokensResponse { tokens })
    }

    /// Revokes every refresh token of the account.
    ///
    /// Access tokens already handed out stay valid until they expire.
    pub async fn logout(&self, user_id: &str) -> ServiceResult<()> {
        let revoked = RefreshTokenRepository::new(self.pool)
            .delete_all_for_user(user_id)
            .await?;

        tracing::info!("Revoked {} refresh token(s) for account {}", revoked, user_id);
        Ok(())
    }

    /// Issues a session for `user_id` using the pool.
    pub async fn issue_session(&self, user_id: &str) -> ServiceResult<SessionTokens> {
        self.issue_session_with(self.pool, user_id).await
    }

    /// Signs an access token and stores a fresh refresh token through
    /// `executor`. Nothing is returned unless both succeed.
    async fn issue_session_with<'e, E>(&self, executor: E, user_id: &str) -> ServiceResult<SessionTokens>
    where
        E: SqliteExecutor<'e>,
    {
        let (access_token, expires_at) = self.jwt_utils.generate_token(user_id)?;

        let refresh_token = RefreshToken {
            token: generate_random_string(REFRESH_TOKEN_LENGTH),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS),
        };

        if !RefreshTokenRepository::create(executor, &refresh_token).await? {
            return Err(ServiceError::internal_error("refresh token collision"));
        }

        tracing::debug!("Issued session for account {}", user_id);

        Ok(SessionTokens {
            access_token,
            refresh_token: refresh_token.token,
            expires_at,
        })
    }

    /// Function to hash a password before storing in database
    ///
    /// # Errors
    /// Returns `ServiceError` if hashing fails; the plaintext is never stored
    fn hash_password(&self, password: &str) -> ServiceResult<String> {
        hash(password, self.password_cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Constant-time comparison of `password` against a stored bcrypt hash.
    /// A malformed hash counts as a mismatch.
    fn verify_password(password: &str, password_hash: &str) -> bool {
        verify(password, password_hash).unwrap_or(false)
    }
}
