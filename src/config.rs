use clap::Parser;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::providers::{Provider, select_provider};

/// Environment variable consulted when `--bucket` is not given
pub const BUCKET_ENV_VAR: &str = "S3_BUCKET";

/// Command-line arguments shared by the source and sink stages
#[derive(Debug, Clone, Default, Parser)]
pub struct TransferArgs {
    /// Path to the workflow data directory
    #[arg(long)]
    pub datadir: Option<PathBuf>,

    /// S3 bucket holding the workflow data archive (defaults to env var S3_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object name in the S3 bucket for the workflow data archive
    #[arg(long)]
    pub dataobj: Option<String>,

    /// Skip the S3 download/upload and exit successfully
    #[arg(long, default_value_t = false)]
    pub bypass: bool,

    /// Custom S3-compatible endpoint (LocalStack, MinIO); enables path-style addressing
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// AWS region override
    #[arg(long)]
    pub region: Option<String>,
}

/// Command-line arguments for the worker stage
#[derive(Debug, Clone, Default, Parser)]
pub struct WorkerArgs {
    /// Path to the workflow data directory
    #[arg(long)]
    pub datadir: Option<PathBuf>,
}

impl WorkerArgs {
    pub fn datadir(&self) -> Result<PathBuf, ConfigError> {
        self.datadir
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or(ConfigError::MissingDataDir)
    }
}

/// Where the bucket name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSource {
    Flag,
    Environment,
}

/// Resolve the bucket name. Sources are tried in priority order
/// (flag, then environment) and the first non-empty value wins.
/// Surrounding whitespace is trimmed from the value that is kept.
pub fn resolve_bucket<F>(
    flag: Option<&str>,
    lookup: F,
) -> Result<(String, BucketSource), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let candidates = [
        (BucketSource::Flag, flag.map(String::from)),
        (BucketSource::Environment, lookup(BUCKET_ENV_VAR)),
    ];

    candidates
        .into_iter()
        .find_map(|(source, value)| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (v, source))
        })
        .ok_or(ConfigError::MissingBucket)
}

/// Fully resolved settings for a source or sink run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    pub datadir: PathBuf,
    pub bucket: String,
    pub bucket_source: BucketSource,
    pub dataobj: String,
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
}

impl TransferConfig {
    /// Provider used to build the S3 client for this run
    pub fn provider(&self) -> Box<dyn Provider> {
        select_provider(self.endpoint_url.clone(), self.region.clone())
    }
}

/// What a transfer stage should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// `--bypass` was given; do nothing
    Bypass,
    Transfer(TransferConfig),
}

impl TransferArgs {
    /// Decide what to do using the process environment
    pub fn plan(&self) -> Result<Plan, ConfigError> {
        self.plan_with(|name| std::env::var(name).ok())
    }

    /// Decide what to do with an explicit environment lookup.
    /// Bypass short-circuits every other check.
    pub fn plan_with<F>(&self, lookup: F) -> Result<Plan, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.bypass {
            return Ok(Plan::Bypass);
        }

        let (bucket, bucket_source) = resolve_bucket(self.bucket.as_deref(), lookup)?;

        let datadir = self
            .datadir
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or(ConfigError::MissingDataDir)?;

        let dataobj = self
            .dataobj
            .clone()
            .filter(|o| !o.trim().is_empty())
            .ok_or(ConfigError::MissingDataObject)?;

        Ok(Plan::Transfer(TransferConfig {
            datadir,
            bucket,
            bucket_source,
            dataobj,
            endpoint_url: self.endpoint_url.clone(),
            region: self.region.clone(),
        }))
    }
}
