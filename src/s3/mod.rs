pub mod client;
pub mod memory;
pub mod metrics;
pub mod transfer;

pub use client::S3Client;
pub use memory::MemoryStore;
pub use metrics::TransferMetrics;
pub use transfer::{download_to_file, upload_file};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Whole-object access to a bucket/key store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an entire object's contents
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Store an object, replacing any existing object under the same key
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()>;
}
