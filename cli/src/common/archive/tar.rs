//! # TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module creates gzipped tarballs (`.tar.gz`) of a directory. The archiver
//! uses it to pack the prepared working copy.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for building the archive structure and
//! `flate2` (via `compression::gzip_writer`) for Gzip compression.
//!
//! - The directory is added recursively with `append_dir_all(".", ..)`, so entry
//!   paths are relative to the directory and extract under `./`.
//! - Symlinks are stored as links rather than followed.
//! - The archive is streamed to any `Write` sink; `write_tar_gz_file` targets a
//!   file made by `create_temp_archive`, so a failed run leaves nothing behind.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::tar;
//!
//! let archive = tar::create_temp_archive("servo")?;
//! tar::write_tar_gz_file(working_copy.path(), archive.as_file(), 6)?;
//! println!("Archive written to {}", archive.path().display());
//! ```
//!
use crate::common::archive::compression;
use crate::core::error::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Streams a gzipped tar of `source_dir` into `writer` and returns the writer.
///
/// ## Errors
///
/// Returns an `Err` if:
/// - The `source_dir` directory cannot be read or accessed.
/// - Any file or subdirectory cannot be added to the archive (e.g., permissions issues).
/// - Finishing the TAR structure or the Gzip stream fails.
pub fn write_tar_gz<W: Write>(source_dir: &Path, writer: W, level: u32) -> Result<W> {
    let enc = compression::gzip_writer(writer, level)?;
    let mut tar_builder = tar::Builder::new(enc);
    tar_builder.follow_symlinks(false);

    tar_builder
        .append_dir_all(".", source_dir)
        .with_context(|| {
            format!(
                "Failed to add directory '{}' contents to the tar archive",
                source_dir.display()
            )
        })?;

    let encoder = tar_builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    encoder
        .finish()
        .context("Failed to finish gzip compression stream")
}

/// # Temporary Archive File (`create_temp_archive`)
///
/// Creates an empty `<prefix>XXXX.tar.gz` in the system temp directory. It is
/// created separately from writing so callers can register it for cleanup
/// before any data goes in.
pub fn create_temp_archive(prefix: &str) -> Result<NamedTempFile> {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".tar.gz")
        .tempfile()
        .context("Failed to create temporary archive file")?;
    info!("Making archive in {}", temp.path().display());
    Ok(temp)
}

/// Writes a gzipped tar of `source_dir` into `file` and syncs it to disk.
pub fn write_tar_gz_file(source_dir: &Path, file: &File, level: u32) -> Result<()> {
    let writer = write_tar_gz(source_dir, BufWriter::new(file), level)?;
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush archive to disk")?;
    file.sync_all().context("Failed to sync archive to disk")
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::HashSet;
    use std::fs;
    use tar::Archive;
    use tempfile::tempdir;

    fn entry_names<R: std::io::Read>(reader: R) -> Result<HashSet<String>> {
        let mut archive = Archive::new(GzDecoder::new(reader));
        let mut names = HashSet::new();
        for entry in archive.entries()? {
            let entry = entry?;
            let path = entry.path()?.to_string_lossy().replace('\\', "/");
            names.insert(path.trim_end_matches('/').to_string());
        }
        Ok(names)
    }

    #[test]
    fn test_write_tar_gz_basic() -> Result<()> {
        let temp_dir = tempdir()?;
        let dir_path = temp_dir.path();
        fs::write(dir_path.join("GIT_REVISION"), "abc\n")?;
        fs::create_dir(dir_path.join("vendor"))?;
        fs::write(dir_path.join("vendor/lib.rs"), "world")?;

        let tar_data = write_tar_gz(dir_path, Vec::new(), 6)?;
        assert!(!tar_data.is_empty());

        let names = entry_names(tar_data.as_slice())?;
        assert!(names.contains("GIT_REVISION"));
        assert!(names.contains("vendor"));
        assert!(names.contains("vendor/lib.rs"));
        assert!(names.iter().all(|n| !n.starts_with('/')));
        Ok(())
    }

    #[test]
    fn test_write_tar_gz_file_roundtrips_content() -> Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("GIT_REVISION"), "deadbeef\n")?;

        let archive = create_temp_archive("unit-test")?;
        write_tar_gz_file(temp_dir.path(), archive.as_file(), 1)?;
        let file_name = archive.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("unit-test"));
        assert!(file_name.ends_with(".tar.gz"));

        let mut tar = Archive::new(GzDecoder::new(fs::File::open(archive.path())?));
        tar.unpack(temp_dir.path().join("out"))?;
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("out/GIT_REVISION"))?,
            "deadbeef\n"
        );
        Ok(())
    }

    #[test]
    fn test_invalid_level_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        assert!(write_tar_gz(temp_dir.path(), Vec::new(), 42).is_err());
        Ok(())
    }
}
