//! User business logic service.
//!
//! Handles profile reads and the partial update of name and preferences.

use crate::database::models::{UpdateProfile, UserProfile};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use sqlx::SqlitePool;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves a profile with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_profile(&self, id: &str) -> ServiceResult<UserProfile> {
        let repo = UserRepository::new(self.pool);
        let profile = repo
            .get_profile(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(profile)
    }

    /// Applies the supplied name/preference fields and returns the
    /// refreshed profile.
    pub async fn update_profile(
        &self,
        id: &str,
        update: UpdateProfile,
    ) -> ServiceResult<UserProfile> {
        update.validate()?;

        let repo = UserRepository::new(self.pool);
        if !repo.update_profile(id, &update).await? {
            return Err(ServiceError::not_found("User", id));
        }

        self.get_profile(id).await
    }
}
