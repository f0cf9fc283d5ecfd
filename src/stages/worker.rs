use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::WorkerArgs;
use crate::error::StageOutcome;

/// Program name used in log lines
pub const NAME: &str = "forge-worker";

/// Line written into each new file
pub const WORKER_MESSAGE: &str =
    "Worker module created a new file and wrote it to the workflow data directory!";

/// Minute precision, 12-hour clock: `2026-10-17_03:42PM`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%I:%M%p";

/// Entry point for the `forge-worker` binary
pub fn run(args: &WorkerArgs) -> Result<StageOutcome> {
    let datadir = args.datadir()?;
    process_data(&datadir, Local::now())?;
    Ok(StageOutcome::Completed)
}

/// Name of the file the worker writes at `now`
pub fn file_name_at<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}.txt", now.format(TIMESTAMP_FORMAT))
}

/// Append the worker line to the timestamped file in `datadir`, then log and
/// return the names of every entry in `datadir` (sorted, not recursive)
pub fn process_data<Tz>(datadir: &Path, now: DateTime<Tz>) -> Result<Vec<String>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let path = datadir.join(file_name_at(&now));
    info!(
        path = %path.display(),
        "creating a new file and writing it to workflow data directory '{}'",
        path.display()
    );

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{WORKER_MESSAGE}")
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "listing files contained in workflow data directory '{}'",
        datadir.display()
    );
    let mut names = fs::read_dir(datadir)
        .with_context(|| format!("Failed to list {}", datadir.display()))?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list {}", datadir.display()))?;
    names.sort();

    for name in &names {
        info!("{name}");
    }

    Ok(names)
}
