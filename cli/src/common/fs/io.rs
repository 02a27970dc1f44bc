//! # Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` and `tempfile` for the file operations the
//! archiver performs, each adding context to failures.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing; fails if the
//!   path exists but is not a directory.
//! - **`write_string_to_file`**: Writes (overwriting) a file, creating its parent directory.
//! - **`append_with_separator`**: Opens an existing file in append mode and writes a blank
//!   separator line followed by the given text. The file must already exist.
//! - **`move_into_place`**: Moves a `NamedTempFile` to its final path, overwriting whatever is
//!   there. A plain rename is attempted first; if that fails (typically because the
//!   destination is on another filesystem) the data is copied into a sibling temporary
//!   file next to the destination and renamed over it, so the destination never holds a
//!   partially written file.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::write_string_to_file(&copy_root.join("GIT_REVISION"), revision.as_str())?;
//! io::append_with_separator(&copy_root.join(".cargo/config.toml"), &fragment)?;
//! io::move_into_place(archive_tmp, &destination)?;
//! ```
//!
use crate::core::error::{Result, VendorError};
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(VendorError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Writes string content to a specified file path, overwriting if it exists.
///
/// The parent directory is created first when needed.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Appends `"\n"` followed by `text` to an existing file.
///
/// A missing file is an error, never created implicitly; callers decide up front
/// whether an absent file should be created.
pub fn append_with_separator(path: &Path, text: &str) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!(VendorError::FileSystem(format!(
            "Cannot append to {:?}: file does not exist",
            path
        )));
    }
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for appending", path))?;
    file.write_all(b"\n")
        .and_then(|_| file.write_all(text.as_bytes()))
        .and_then(|_| file.flush())
        .with_context(|| format!("Failed to append to {:?}", path))?;
    info!("Appended {} bytes to {:?}", text.len() + 1, path);
    Ok(())
}

/// Moves `temp` to `destination`, replacing any existing file.
///
/// The destination's parent directory is created when missing.
pub fn move_into_place(temp: NamedTempFile, destination: &Path) -> Result<()> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir_exists(parent)?;

    let temp = match temp.persist(destination) {
        Ok(_) => {
            debug!("Renamed archive into {:?}", destination);
            return Ok(());
        }
        Err(e) => {
            warn!(
                "Rename into {:?} failed ({}); falling back to copy",
                destination, e.error
            );
            e.file
        }
    };

    // Stage next to the destination so the final step is a same-filesystem rename.
    let staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create staging file in {:?}", parent))?;
    fs::copy(temp.path(), staged.path()).with_context(|| {
        format!("Failed to copy {:?} to {:?}", temp.path(), staged.path())
    })?;
    staged
        .persist(destination)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move archive to {:?}", destination))?;
    debug!("Copied archive into {:?}", destination);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_write_string_to_file_overwrites() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("nested/GIT_REVISION");
        write_string_to_file(&file_path, "first\n")?;
        write_string_to_file(&file_path, "second\n")?;
        assert_eq!(fs::read_to_string(&file_path)?, "second\n");
        Ok(())
    }

    #[test]
    fn test_append_with_separator() -> Result<()> {
        let base_dir = tempdir()?;
        let config = base_dir.path().join("config.toml");
        fs::write(&config, "[build]\njobs = 4\n")?;
        append_with_separator(&config, "[source.crates-io]\nreplace-with = \"vendored-sources\"\n")?;
        assert_eq!(
            fs::read_to_string(&config)?,
            "[build]\njobs = 4\n\n[source.crates-io]\nreplace-with = \"vendored-sources\"\n"
        );
        Ok(())
    }

    #[test]
    fn test_append_requires_existing_file() -> Result<()> {
        let base_dir = tempdir()?;
        let missing = base_dir.path().join("config.toml");
        assert!(append_with_separator(&missing, "x").is_err());
        assert!(!missing.exists());
        Ok(())
    }

    #[test]
    fn test_move_into_place_overwrites_and_creates_parent() -> Result<()> {
        let staging = tempdir()?;
        let out = tempdir()?;
        let destination = out.path().join("dist/servo.tar.gz");

        let mut first = NamedTempFile::new_in(staging.path())?;
        first.write_all(b"first")?;
        move_into_place(first, &destination)?;
        assert_eq!(fs::read(&destination)?, b"first");

        let mut second = NamedTempFile::new_in(staging.path())?;
        second.write_all(b"second")?;
        move_into_place(second, &destination)?;
        assert_eq!(fs::read(&destination)?, b"second");

        // Only the archive itself remains in the destination directory.
        assert_eq!(fs::read_dir(out.path().join("dist"))?.count(), 1);
        Ok(())
    }
}
