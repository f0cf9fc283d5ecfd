//! Metrics collection for object transfers.
//!
//! Tracks bytes moved, transfer count and timing for the whole-object
//! downloads and uploads a stage performs.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Direction of a single transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Download,
    Upload,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Download => "download",
            Direction::Upload => "upload",
        }
    }
}

/// Metrics for a single transfer
#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub direction: Direction,
    /// Object key
    pub key: String,
    /// Number of bytes transferred
    pub bytes: u64,
    /// Duration of the transfer
    pub duration: Duration,
}

/// Totals for one direction, derived from the transfer records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionTotals {
    pub transfers: usize,
    pub bytes: u64,
    pub duration: Duration,
}

/// Collector for transfer metrics.
#[derive(Debug)]
pub struct TransferMetrics {
    /// Total bytes transferred
    total_bytes: AtomicU64,
    /// Total number of transfers
    transfer_count: AtomicUsize,
    /// Individual transfer records
    transfers: RwLock<Vec<TransferRecord>>,
    /// When the collector was created
    started: Instant,
}

impl Default for TransferMetrics {
    fn default() -> Self {
        Self {
            total_bytes: AtomicU64::new(0),
            transfer_count: AtomicUsize::new(0),
            transfers: RwLock::new(Vec::new()),
            started: Instant::now(),
        }
    }
}

impl TransferMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed transfer
    pub fn record(&self, direction: Direction, key: &str, bytes: u64, duration: Duration) {
        self.total_bytes.fetch_add(bytes, Ordering::Relaxed);
        self.transfer_count.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut transfers) = self.transfers.write() {
            transfers.push(TransferRecord {
                direction,
                key: key.to_string(),
                bytes,
                duration,
            });
        }
    }

    /// Get total bytes transferred
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }

    /// Get transfer count
    pub fn transfer_count(&self) -> usize {
        self.transfer_count.load(Ordering::Relaxed)
    }

    /// Time since the collector was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Sum the records for one direction
    pub fn totals(&self, direction: Direction) -> DirectionTotals {
        let Ok(transfers) = self.transfers.read() else {
            return DirectionTotals::default();
        };
        transfers
            .iter()
            .filter(|t| t.direction == direction)
            .fold(DirectionTotals::default(), |mut acc, t| {
                acc.transfers += 1;
                acc.bytes += t.bytes;
                acc.duration += t.duration;
                acc
            })
    }

    /// Log one info line per direction that saw traffic, then the overall total
    pub fn log_summary(&self) {
        for direction in [Direction::Download, Direction::Upload] {
            let totals = self.totals(direction);
            if totals.transfers == 0 {
                continue;
            }
            tracing::info!(
                direction = direction.as_str(),
                transfers = totals.transfers,
                bytes = totals.bytes,
                transfer_ms = totals.duration.as_millis() as u64,
                "transfer totals"
            );
        }
        tracing::info!(
            transfers = self.transfer_count(),
            bytes = self.total_bytes(),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "transfer summary"
        );
    }
}
