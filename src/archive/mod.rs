pub mod scratch;
pub mod zip;

pub use scratch::ScratchFile;
pub use self::zip::{pack_directory, unpack_archive};

use std::path::{Path, PathBuf};

/// Counts gathered while packing or unpacking an archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub directories: usize,
    /// Uncompressed size of all file entries
    pub bytes: u64,
}

/// Local file name for the archive of a data object: the key's file name with
/// its last extension replaced by `zip` (`runs/data.tar.gz` -> `data.tar.zip`)
pub fn archive_name_for(dataobj: &str) -> PathBuf {
    Path::new(local_name_for(dataobj)).with_extension("zip")
}

/// Local file name a downloaded data object is written to
pub fn local_name_for(dataobj: &str) -> &str {
    dataobj
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(dataobj)
}
