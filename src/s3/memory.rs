use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::ObjectStore;

/// In-process object store keyed by bucket and key.
///
/// Clones share the same contents, so a sink run and a later source run can
/// be pointed at one store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<(String, String), Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an object exists
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(&(bucket.to_string(), key.to_string())))
            .unwrap_or(false)
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let objects = self
            .objects
            .read()
            .map_err(|_| anyhow!("object store lock poisoned"))?;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("Failed to get object s3://{}/{}: NoSuchKey", bucket, key))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| anyhow!("object store lock poisoned"))?;
        objects.insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}
