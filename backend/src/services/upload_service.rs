//! Image upload brokering.
//!
//! Clients upload images straight to object storage; the backend only hands
//! out a short-lived presigned PUT URL under the caller's own key prefix.

use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// How long a presigned upload URL stays usable.
pub const PRESIGN_TTL: Duration = Duration::from_secs(15 * 60);

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Produces presigned PUT URLs for an object key.
#[async_trait]
pub trait UploadSigner: Send + Sync {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
pub struct PresignResult {
    /// Presigned URL the client PUTs the image to
    pub url: String,
    /// Public URL the object will be served from once uploaded
    pub key: String,
}

pub struct UploadService<'a> {
    signer: &'a dyn UploadSigner,
    public_url: &'a str,
}

impl<'a> UploadService<'a> {
    pub fn new(signer: &'a dyn UploadSigner, public_url: &'a str) -> Self {
        Self { signer, public_url }
    }

    pub async fn presign(&self, user_id: &str, content_type: &str) -> ServiceResult<PresignResult> {
        let content_type = match content_type.trim() {
            "" => DEFAULT_CONTENT_TYPE,
            value => value,
        };
        let key = format!("users/{}/images/{}", user_id, Uuid::now_v7());

        let url = self
            .signer
            .presign_put(&key, content_type, PRESIGN_TTL)
            .await
            .map_err(|e| {
                tracing::error!("Presign failed for {}: {:#}", key, e);
                ServiceError::internal_error("could not generate upload URL")
            })?;

        Ok(PresignResult {
            url,
            key: format!("{}/{}", self.public_url, key),
        })
    }
}
