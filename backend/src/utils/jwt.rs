//! JWT token utilities for authentication and authorization.
//!
//! Provides access token creation and the single validation path every
//! protected route goes through. Tokens are HS256 only: validation rejects any
//! other algorithm named in the header, bad signatures and expired tokens,
//! without touching the database.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// The only signing algorithm accepted.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT Claims structure asserting the caller's identity
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the server secret
    pub fn new(secret: &str) -> Result<Self, ServiceError> {
        if secret.is_empty() {
            return Err(ServiceError::internal_error("JWT secret is not configured"));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtUtils {
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Generate a signed access token for `user_id`.
    ///
    /// Returns the token together with its absolute expiry.
    pub fn generate_token(&self, user_id: &str) -> Result<(String, DateTime<Utc>), ServiceError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(ACCESS_TOKEN_TTL_SECONDS);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))?;

        Ok((token, expires_at))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                ServiceError::unauthorized("invalid token")
            })
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}
