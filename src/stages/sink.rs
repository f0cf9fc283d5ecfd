use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::archive::{ScratchFile, archive_name_for, pack_directory};
use crate::config::{Plan, TransferArgs, TransferConfig};
use crate::error::StageOutcome;
use crate::s3::{ObjectStore, S3Client, TransferMetrics, upload_file};

/// Program name used in log lines
pub const NAME: &str = "forge-sink";

/// Entry point for the `forge-sink` binary
pub async fn run(args: &TransferArgs) -> Result<StageOutcome> {
    let config = match args.plan()? {
        Plan::Bypass => {
            info!("Bypassing S3 download/upload. Exiting.");
            return Ok(StageOutcome::Bypassed);
        }
        Plan::Transfer(config) => config,
    };

    let client = S3Client::from_provider(&*config.provider()).await?;
    let workdir = std::env::current_dir().context("Failed to determine working directory")?;
    upload_workflow_data(&config, &client, &workdir).await?;

    Ok(StageOutcome::Completed)
}

/// Zip the data directory into `workdir`, upload the archive under the data
/// object key, then delete the local archive
pub async fn upload_workflow_data<S>(
    config: &TransferConfig,
    store: &S,
    workdir: &Path,
) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    let metrics = TransferMetrics::new();
    let scratch = ScratchFile::new(workdir.join(archive_name_for(&config.dataobj)));

    info!(
        path = %config.datadir.display(),
        "creating zip archive of data directory '{}'",
        config.datadir.display()
    );
    let summary = pack_directory(&config.datadir, scratch.path())?;
    info!(
        files = summary.files,
        directories = summary.directories,
        bytes = summary.bytes,
        "archive created"
    );

    info!(
        bucket = %config.bucket,
        bucket_source = ?config.bucket_source,
        key = %config.dataobj,
        "uploading data archive to S3 bucket '{}'",
        config.bucket
    );
    upload_file(store, scratch.path(), &config.bucket, &config.dataobj, &metrics).await?;

    drop(scratch);
    metrics.log_summary();
    Ok(())
}
