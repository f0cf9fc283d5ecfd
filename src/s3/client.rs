use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::ObjectStore;
use crate::providers::{Provider, create_s3_client};

/// Wrapper around AWS S3 client
pub struct S3Client {
    client: Client,
}

impl S3Client {
    /// Create a client from a provider's configuration
    pub async fn from_provider(provider: &dyn Provider) -> Result<Self> {
        let config = provider
            .build_config()
            .await
            .with_context(|| format!("Failed to configure provider '{}'", provider.name()))?;
        let client = create_s3_client(config).await?;
        Ok(S3Client { client })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        S3Client { client }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .context(format!("Failed to get object s3://{}/{}", bucket, key))?;

        let bytes = resp
            .body
            .collect()
            .await
            .context("Failed to read object body")?
            .into_bytes();

        Ok(bytes)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .context(format!("Failed to put object s3://{}/{}", bucket, key))?;

        Ok(())
    }
}
