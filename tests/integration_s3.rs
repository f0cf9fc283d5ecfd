//! Round trips against LocalStack.
//!
//! Start LocalStack (`docker run -p 4566:4566 localstack/localstack`) and run
//! with: cargo test --test integration_s3 -- --ignored --test-threads=1

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use forge::config::{BucketSource, TransferConfig};
use forge::s3::{ObjectStore, S3Client};
use forge::stages::{sink, source};

/// Test bucket name
const TEST_BUCKET: &str = "forge-workflow-data-test";

/// Helper function to create an S3 client pointing to localstack
async fn create_localstack_client() -> Client {
    let endpoint_url =
        std::env::var("AWS_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_string());

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region("us-east-1")
        .load()
        .await;

    // Build S3-specific config with endpoint
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .endpoint_url(&endpoint_url)
        .force_path_style(true) // Required for LocalStack
        .build();

    Client::from_conf(s3_config)
}

/// Create the test bucket, tolerating one left over from an earlier run
async fn setup_test_bucket(client: &Client) {
    let _ = client.create_bucket().bucket(TEST_BUCKET).send().await;
}

fn transfer_config(datadir: PathBuf, dataobj: &str) -> TransferConfig {
    TransferConfig {
        datadir,
        bucket: TEST_BUCKET.to_string(),
        bucket_source: BucketSource::Flag,
        dataobj: dataobj.to_string(),
        endpoint_url: None,
        region: None,
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_sink_then_source_round_trip() {
    let client = create_localstack_client().await;
    setup_test_bucket(&client).await;
    let store = S3Client::from_client(client);

    let work = TempDir::new().unwrap();
    let original = work.path().join("d");
    let restored = work.path().join("d2");
    fs::create_dir_all(&original).unwrap();
    fs::write(original.join("a.txt"), b"first file\n").unwrap();
    fs::write(original.join("b.txt"), b"second file\n").unwrap();

    let snapshot = transfer_config(original, "data.zip");
    sink::upload_workflow_data(&snapshot, &store, work.path())
        .await
        .expect("sink failed");
    assert!(!work.path().join("data.zip").exists());

    let restore = transfer_config(restored.clone(), "data.zip");
    source::download_workflow_data(&restore, &store, work.path())
        .await
        .expect("source failed");
    assert!(!work.path().join("data.zip").exists());

    assert_eq!(fs::read(restored.join("a.txt")).unwrap(), b"first file\n");
    assert_eq!(fs::read(restored.join("b.txt")).unwrap(), b"second file\n");
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_put_and_get_object() {
    let client = create_localstack_client().await;
    setup_test_bucket(&client).await;
    let store = S3Client::from_client(client);

    store
        .put_object(TEST_BUCKET, "raw.bin", bytes::Bytes::from_static(b"\x00\x01\x02"))
        .await
        .unwrap();
    let body = store.get_object(TEST_BUCKET, "raw.bin").await.unwrap();
    assert_eq!(&body[..], b"\x00\x01\x02");
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_source_missing_object_fails() {
    let client = create_localstack_client().await;
    setup_test_bucket(&client).await;
    let store = S3Client::from_client(client);

    let work = TempDir::new().unwrap();
    let result = source::download_workflow_data(
        &transfer_config(work.path().join("d"), "does-not-exist.zip"),
        &store,
        work.path(),
    )
    .await;

    assert!(result.is_err());
    assert!(!work.path().join("does-not-exist.zip").exists());
}
