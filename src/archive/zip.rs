use anyhow::{Context, Result, anyhow};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::ArchiveSummary;

/// Default permission bits for entries that carry none
const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIR_MODE: u32 = 0o755;

/// Files at or above this size need ZIP64 headers
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Create a zip archive at `archive` holding everything under `dir`.
///
/// Entry names are relative to `dir` and use `/` separators. Directories get
/// their own entries so empty ones survive a round trip. Symlinks and other
/// special files are skipped.
pub fn pack_directory(dir: &Path, archive: &Path) -> Result<ArchiveSummary> {
    if !dir.is_dir() {
        return Err(anyhow!("Not a directory: {}", dir.display()));
    }

    let file = File::create(archive)
        .with_context(|| format!("Failed to create archive {}", archive.display()))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let mut summary = ArchiveSummary::default();

    // The archive may live inside the directory being packed
    let skip = fs::canonicalize(archive).ok();

    add_directory_contents(&mut writer, dir, "", skip.as_deref(), &mut summary)?;

    let mut out = writer
        .finish()
        .with_context(|| format!("Failed to finish archive {}", archive.display()))?;
    io::Write::flush(&mut out)
        .with_context(|| format!("Failed to flush archive {}", archive.display()))?;

    debug!(
        files = summary.files,
        directories = summary.directories,
        bytes = summary.bytes,
        "packed directory"
    );
    Ok(summary)
}

fn add_directory_contents<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    dir: &Path,
    prefix: &str,
    skip: Option<&Path>,
    summary: &mut ArchiveSummary,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_name = entry
            .file_name()
            .into_string()
            .map_err(|_| anyhow!("file name is not valid UTF-8: {}", path.display()))?;
        let name = format!("{prefix}{file_name}");
        let metadata = fs::symlink_metadata(&path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        if metadata.is_dir() {
            let options = entry_options(mode_of(&metadata, DEFAULT_DIR_MODE), false);
            writer
                .add_directory(format!("{name}/"), options)
                .with_context(|| format!("Failed to add directory {name}"))?;
            summary.directories += 1;
            add_directory_contents(writer, &path, &format!("{name}/"), skip, summary)?;
        } else if metadata.is_file() {
            if skip.is_some() && fs::canonicalize(&path).ok().as_deref() == skip {
                continue;
            }

            let large = metadata.len() >= ZIP64_THRESHOLD;
            let options = entry_options(mode_of(&metadata, DEFAULT_FILE_MODE), large);
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to add file {name}"))?;
            let mut source =
                File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            summary.bytes += io::copy(&mut source, writer)
                .with_context(|| format!("Failed to write {} into archive", path.display()))?;
            summary.files += 1;
        } else {
            debug!(path = %path.display(), "skipping non-regular file");
        }
    }

    Ok(())
}

fn entry_options(mode: u32, large_file: bool) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
        .large_file(large_file)
}

#[cfg(unix)]
fn mode_of(metadata: &fs::Metadata, _default: u32) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_of(_metadata: &fs::Metadata, default: u32) -> u32 {
    default
}

/// Extract every entry of the zip archive at `archive` into `dir`, creating
/// `dir` if needed. Existing files with the same names are overwritten.
pub fn unpack_archive(archive: &Path, dir: &Path) -> Result<ArchiveSummary> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Not a valid zip archive: {}", archive.display()))?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut summary = ArchiveSummary::default();

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .with_context(|| format!("Failed to read entry {i} of {}", archive.display()))?;

        let relative: PathBuf = entry
            .enclosed_name()
            .ok_or_else(|| anyhow!("Archive entry escapes target directory: {}", entry.name()))?;
        let target = dir.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory {}", target.display()))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut out = File::create(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        summary.bytes += io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to extract {}", relative.display()))?;
        summary.files += 1;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))
                .with_context(|| format!("Failed to set permissions on {}", target.display()))?;
        }
    }

    debug!(
        files = summary.files,
        directories = summary.directories,
        bytes = summary.bytes,
        "unpacked archive"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::TempDir;

    /// Map of relative path -> contents for every file under `dir`
    fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
        fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                    out.insert(rel, fs::read(&path).unwrap());
                }
            }
        }
        let mut out = BTreeMap::new();
        walk(dir, dir, &mut out);
        out
    }

    #[test]
    fn test_round_trip_reproduces_files() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        let dest = work.path().join("dest");
        fs::create_dir_all(src.join("nested/deeper")).unwrap();
        fs::write(src.join("a.txt"), b"alpha\n").unwrap();
        fs::write(src.join("b.txt"), b"").unwrap();
        fs::write(src.join("nested/deeper/c.bin"), [0u8, 159, 146, 150, 255]).unwrap();

        let archive = work.path().join("data.zip");
        let packed = pack_directory(&src, &archive).unwrap();
        assert_eq!(packed.files, 3);
        assert_eq!(packed.directories, 2);
        assert_eq!(packed.bytes, 11);

        let unpacked = unpack_archive(&archive, &dest).unwrap();
        assert_eq!(unpacked, packed);
        assert_eq!(snapshot(&dest), snapshot(&src));
    }

    #[test]
    fn test_empty_directories_survive() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        fs::create_dir_all(src.join("empty")).unwrap();

        let archive = work.path().join("data.zip");
        pack_directory(&src, &archive).unwrap();

        let dest = work.path().join("dest");
        unpack_archive(&archive, &dest).unwrap();
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn test_entry_names_are_relative() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/file.txt"), b"x").unwrap();

        let archive = work.path().join("data.zip");
        pack_directory(&src, &archive).unwrap();

        let zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<_> = zip.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, vec!["sub/", "sub/file.txt"]);
    }

    #[test]
    fn test_archive_inside_directory_is_skipped() {
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("a.txt"), b"a").unwrap();

        let archive = work.path().join("data.zip");
        let summary = pack_directory(work.path(), &archive).unwrap();
        assert_eq!(summary.files, 1);
    }

    #[test]
    fn test_unpack_overwrites_existing_files() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        let dest = work.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(src.join("a.txt"), b"new").unwrap();
        fs::write(dest.join("a.txt"), b"old contents").unwrap();
        fs::write(dest.join("keep.txt"), b"untouched").unwrap();

        let archive = work.path().join("data.zip");
        pack_directory(&src, &archive).unwrap();
        unpack_archive(&archive, &dest).unwrap();

        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"new");
        assert_eq!(fs::read(dest.join("keep.txt")).unwrap(), b"untouched");
    }

    #[test]
    fn test_unpack_rejects_path_traversal() {
        let work = TempDir::new().unwrap();
        let archive = work.path().join("evil.zip");
        {
            let mut writer = ZipWriter::new(File::create(&archive).unwrap());
            writer
                .start_file("../escape.txt", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"gotcha").unwrap();
            writer.finish().unwrap();
        }

        let dest = work.path().join("dest");
        let err = unpack_archive(&archive, &dest).unwrap_err();
        assert!(err.to_string().contains("escapes target directory"));
        assert!(!work.path().join("escape.txt").exists());
    }

    #[test]
    fn test_unpack_rejects_non_zip() {
        let work = TempDir::new().unwrap();
        let archive = work.path().join("data.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = unpack_archive(&archive, &work.path().join("dest")).unwrap_err();
        assert!(err.to_string().contains("Not a valid zip archive"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pack_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        // Some filesystems refuse non-UTF-8 names outright
        if fs::write(src.join(name), b"latin-1").is_err() {
            return;
        }

        let err = pack_directory(&src, &work.path().join("data.zip")).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    #[ignore] // Writes a sparse 4 GiB file; run with: cargo test -- --ignored
    fn test_round_trip_file_over_four_gib() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("src");
        let dest = work.path().join("dest");
        fs::create_dir_all(&src).unwrap();

        let size = (1u64 << 32) + 1;
        let big = File::create(src.join("big.bin")).unwrap();
        big.set_len(size).unwrap();
        drop(big);

        let archive = work.path().join("data.zip");
        let packed = pack_directory(&src, &archive).unwrap();
        assert_eq!(packed.bytes, size);

        let unpacked = unpack_archive(&archive, &dest).unwrap();
        assert_eq!(unpacked.bytes, size);
        assert_eq!(fs::metadata(dest.join("big.bin")).unwrap().len(), size);
    }

    #[test]
    fn test_pack_missing_directory() {
        let work = TempDir::new().unwrap();
        let result = pack_directory(&work.path().join("nope"), &work.path().join("data.zip"));
        assert!(result.is_err());
    }
}
