//! The three pipeline stages.
//!
//! `source` pulls the workflow data archive out of object storage into the
//! data directory, `worker` touches the directory, and `sink` pushes it back.
//! Each stage has a `run` entry point used by its binary and a lower-level
//! function that takes an explicit [`ObjectStore`](crate::s3::ObjectStore)
//! and working directory.

pub mod sink;
pub mod source;
pub mod worker;
