//! # Filesystem Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! This module copies a project tree into a working directory while leaving out
//! entries whose names match an `ExcludeFilter`.
//!
//! ## Architecture
//!
//! `copy_tree_filtered` walks the source with `walkdir`:
//! - `filter_entry` prunes excluded entries, so an excluded directory is never
//!   descended into and the filter is applied at every depth.
//! - Symbolic links are followed and their contents copied; a dangling link or
//!   a link cycle aborts the copy.
//! - Directories are created with `create_dir_all`; files are copied with
//!   `std::fs::copy`, which carries over permission bits.
//! - Besides name patterns, the filter may name exact paths (the archive's own
//!   destination when it sits under the root).
//! - A cancellation flag is polled before each entry.
//! - The target may already exist (e.g. a fresh `TempDir`); existing files are
//!   overwritten.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::{copy, filter::ExcludeFilter};
//!
//! let filter = ExcludeFilter::new(&["*.git", "target"])?;
//! let stats = copy::copy_tree_filtered(&project_root, working_copy.path(), &filter, scratch.cancel_flag())?;
//! println!("Copied {} files", stats.files);
//! ```
//!
use crate::common::fs::filter::ExcludeFilter;
use crate::core::error::{Result, VendorError};
use anyhow::{anyhow, Context};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Totals gathered while copying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    pub excluded: u64,
}

/// # Filtered Tree Copy (`copy_tree_filtered`)
///
/// Copies the contents of `source` into `target`, skipping excluded entries.
/// `cancel` is polled before every entry; once set, the copy stops.
///
/// ## Returns
///
/// The `CopyStats` of what was copied and how many entries were pruned.
///
/// ## Errors
///
/// Returns an `Err` if:
/// - `source` is not a directory, or `target` lies inside `source`.
/// - Traversal fails (permissions, dangling symlink, symlink loop).
/// - Creating a directory or copying a file fails.
/// - `cancel` is set (`VendorError::Interrupted`).
pub fn copy_tree_filtered(
    source: &Path,
    target: &Path,
    filter: &ExcludeFilter,
    cancel: &AtomicBool,
) -> Result<CopyStats> {
    if !source.is_dir() {
        return Err(anyhow!(VendorError::FileSystem(format!(
            "Copy source is not a directory: {}",
            source.display()
        ))));
    }
    let canonical_source = source
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", source.display()))?;
    if let Ok(canonical_target) = target.canonicalize() {
        if canonical_target.starts_with(&canonical_source) {
            return Err(anyhow!(VendorError::FileSystem(format!(
                "Refusing to copy {} into itself ({})",
                source.display(),
                target.display()
            ))));
        }
    }

    info!("Starting filtered copy from {:?} to {:?}", source, target);
    fs::create_dir_all(target)
        .with_context(|| format!("Failed to create directory {:?}", target))?;

    let mut stats = CopyStats::default();
    // Pruned entries never reach the loop, so the predicate counts them.
    let excluded = Cell::new(0u64);
    let walker = WalkDir::new(source)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            if filter.excludes_entry(entry.path()) {
                debug!("Excluding {:?}", entry.path());
                excluded.set(excluded.get() + 1);
                return false;
            }
            true
        });

    for entry in walker {
        if cancel.load(Ordering::SeqCst) {
            info!("Copy cancelled");
            return Err(anyhow!(VendorError::Interrupted));
        }
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Entry {:?} escaped {:?}", entry.path(), source))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create directory {:?}", destination))?;
            stats.dirs += 1;
        } else {
            let bytes = fs::copy(entry.path(), &destination).with_context(|| {
                format!("Failed to copy {:?} to {:?}", entry.path(), destination)
            })?;
            stats.files += 1;
            stats.bytes += bytes;
        }
    }
    stats.excluded = excluded.get();

    info!(
        "Finished filtered copy: {} files, {} directories, {} bytes, {} entries excluded",
        stats.files, stats.dirs, stats.bytes, stats.excluded
    );
    Ok(stats)
}
