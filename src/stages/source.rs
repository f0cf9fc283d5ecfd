use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::archive::{ScratchFile, local_name_for, unpack_archive};
use crate::config::{Plan, TransferArgs, TransferConfig};
use crate::error::StageOutcome;
use crate::s3::{ObjectStore, S3Client, TransferMetrics, download_to_file};

/// Program name used in log lines
pub const NAME: &str = "forge-source";

/// Entry point for the `forge-source` binary
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
    download_workflow_data(&config, &client, &workdir).await?;

    Ok(StageOutcome::Completed)
}

/// Download the archive object into `workdir`, extract it into the data
/// directory, then delete the downloaded file
pub async fn download_workflow_data<S>(
    config: &TransferConfig,
    store: &S,
    workdir: &Path,
) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    let metrics = TransferMetrics::new();
    let scratch = ScratchFile::new(workdir.join(local_name_for(&config.dataobj)));

    info!(
        bucket = %config.bucket,
        bucket_source = ?config.bucket_source,
        key = %config.dataobj,
        "downloading data archive from S3 bucket '{}'",
        config.bucket
    );
    download_to_file(store, &config.bucket, &config.dataobj, scratch.path(), &metrics).await?;

    info!(
        path = %config.datadir.display(),
        "extracting archive to '{}'",
        config.datadir.display()
    );
    let summary = unpack_archive(scratch.path(), &config.datadir)?;
    info!(
        files = summary.files,
        directories = summary.directories,
        bytes = summary.bytes,
        "archive extracted"
    );

    drop(scratch);
    metrics.log_summary();
    Ok(())
}
