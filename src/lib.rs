//! Pipeline stages that move a workflow data directory through S3.
//!
//! The `forge-source`, `forge-worker` and `forge-sink` binaries are thin
//! wrappers over [`stages`]; they share configuration resolution, logging,
//! the zip codec and the object-store client defined here.

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod s3;
pub mod stages;
