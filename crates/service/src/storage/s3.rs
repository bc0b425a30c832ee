//! S3 object store backend

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use configs::StorageConfig;
use serde_json::Value;
use tracing::{error, info, warn};

use super::object_store::{decode, encode, ObjectStore, StoredObject};
use crate::errors::ServiceError;

/// JSON blobs in a single S3 bucket.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }

    /// Build a client from storage config. Static credentials are used only
    /// when both key id and secret are set; otherwise the default provider
    /// chain (env, profile, IAM role) applies.
    pub async fn connect(cfg: &StorageConfig) -> Result<Self, ServiceError> {
        info!(bucket = %cfg.bucket, region = %cfg.region, "initializing S3 object store");

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()));
        if let Some((id, secret)) = cfg.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(id, secret, None, None, "enrollment-config"));
        }
        if let Some(endpoint) = cfg.endpoint.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if cfg.endpoint.is_some() {
            builder = builder.force_path_style(true);
        }
        Ok(Self::new(Client::from_conf(builder.build()), cfg.bucket.clone()))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<StoredObject, ServiceError> {
        let result = self.client.get_object().bucket(&self.bucket).key(key).send().await;
        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| ServiceError::store(key, e))?
                    .into_bytes();
                let value = decode(key, &bytes)?;
                info!(%key, bucket = %self.bucket, "read object from S3");
                Ok(StoredObject::Present(value))
            }
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    warn!(%key, bucket = %self.bucket, "object not found in S3");
                    return Ok(StoredObject::Absent);
                }
                let ctx = DisplayErrorContext(&err);
                error!(%key, bucket = %self.bucket, error = %ctx, "S3 read failed");
                Err(ServiceError::store(key, ctx))
            }
        }
    }

    async fn put(&self, key: &str, value: &Value) -> Result<(), ServiceError> {
        let body = encode(key, value)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|err| {
                let ctx = DisplayErrorContext(&err);
                error!(%key, bucket = %self.bucket, error = %ctx, "S3 write failed");
                ServiceError::store(key, ctx)
            })?;
        info!(%key, bucket = %self.bucket, "wrote object to S3");
        Ok(())
    }
}
