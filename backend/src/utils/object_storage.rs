//! Presigned PUT URLs against the Cloudflare R2 bucket.
//!
//! R2 speaks the S3 API, so the AWS SDK is pointed at the account's R2
//! endpoint with static credentials and the `auto` region.

use crate::config::StorageConfig;
use crate::services::upload_service::UploadSigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Builder, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;

pub struct R2Signer {
    client: Client,
    bucket: String,
}

impl R2Signer {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "r2-static",
        );

        let s3_config = Builder::new()
            .region(Region::new("auto"))
            .endpoint_url(format!(
                "https://{}.r2.cloudflarestorage.com",
                config.account_id
            ))
            .credentials_provider(credentials)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket_name.clone(),
        }
    }
}

#[async_trait]
impl UploadSigner for R2Signer {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .context("Invalid presign expiry")?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .context("Failed to presign upload")?;

        Ok(request.uri().to_string())
    }
}
