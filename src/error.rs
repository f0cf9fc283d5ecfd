use thiserror::Error;
use tracing::error;

/// Configuration problems detected before a stage touches the filesystem or network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("S3 Bucket was not provided as a CLI argument or ENV variable")]
    MissingBucket,

    #[error("Missing required --datadir flag. Run with --help for usage info")]
    MissingDataDir,

    #[error("Missing required --dataobj flag. Run with --help for usage info")]
    MissingDataObject,
}

impl ConfigError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::MissingBucket
            | ConfigError::MissingDataDir
            | ConfigError::MissingDataObject => 1,
        }
    }
}

/// How a stage finished when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage did its work
    Completed,
    /// `--bypass` was passed and no I/O happened
    Bypassed,
}

/// Turn a stage result into the process outcome.
///
/// Configuration errors get a single `ERROR` line and exit with their code.
/// Anything else is handed back to `main`, which prints the full error chain.
pub fn finish(result: anyhow::Result<StageOutcome>) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) => match err.downcast_ref::<ConfigError>() {
            Some(config_err) => {
                error!("{config_err}. Aborting.");
                std::process::exit(config_err.exit_code());
            }
            None => Err(err),
        },
    }
}
