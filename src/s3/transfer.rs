use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, instrument};

use super::ObjectStore;
use super::metrics::{Direction, TransferMetrics};

/// Download an object into a local file, replacing the file if it exists
#[instrument(skip(store, metrics), fields(%bucket, %key, path = %dest.display()))]
pub async fn download_to_file<S>(
    store: &S,
    bucket: &str,
    key: &str,
    dest: &Path,
    metrics: &TransferMetrics,
) -> Result<u64>
where
    S: ObjectStore + ?Sized,
{
    let start = Instant::now();
    let bytes = store.get_object(bucket, key).await?;

    tokio::fs::write(dest, &bytes)
        .await
        .with_context(|| format!("Failed to write downloaded archive to {}", dest.display()))?;

    let len = bytes.len() as u64;
    metrics.record(Direction::Download, key, len, start.elapsed());
    debug!(bytes = len, "object downloaded");
    Ok(len)
}

/// Upload a local file as an object
#[instrument(skip(store, metrics), fields(%bucket, %key, path = %src.display()))]
pub async fn upload_file<S>(
    store: &S,
    src: &Path,
    bucket: &str,
    key: &str,
    metrics: &TransferMetrics,
) -> Result<u64>
where
    S: ObjectStore + ?Sized,
{
    let start = Instant::now();
    let body = tokio::fs::read(src)
        .await
        .with_context(|| format!("Failed to read archive for upload: {}", src.display()))?;

    let len = body.len() as u64;
    store.put_object(bucket, key, Bytes::from(body)).await?;

    metrics.record(Direction::Upload, key, len, start.elapsed());
    debug!(bytes = len, "object uploaded");
    Ok(len)
}
