//! Log setup shared by the stage binaries.
//!
//! Every stage writes human-readable lines to stdout. The `stage` span carries
//! the program name so each line says which stage produced it, for example
//! `INFO forge{stage=forge-sink}: uploading data archive`.

use std::io::IsTerminal;
use tracing::Span;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable that switches output to JSON lines
pub const LOG_FORMAT_ENV_VAR: &str = "FORGE_LOG_FORMAT";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse a format name; anything other than `json` means text
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV_VAR).ok().as_deref())
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let ansi = std::io::stdout().is_terminal();

    // try_init so a second call (tests) is harmless
    let _ = match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(ansi)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };
}

/// Span that tags every event with the stage's program name
pub fn stage_span(name: &'static str) -> Span {
    tracing::info_span!("forge", stage = %name)
}
