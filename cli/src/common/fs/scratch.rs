//! # Scratch Path Registry (`common::fs::scratch`)
//!
//! File: cli/src/common/fs/scratch.rs
//!
//! ## Overview
//!
//! `tempfile` removes its directories and files when they are dropped, which
//! never happens if the process is torn down by Ctrl-C while a blocking step is
//! still running. Every scratch path is therefore also recorded here.
//!
//! The registry also carries the run's cancellation flag. On interrupt the
//! handler calls `cancel`, gives the worker a bounded time to notice it and
//! unwind (dropping its own guards), and only then calls `purge`, so nothing
//! is recreated after it has been removed.
//!
//! ## Usage
//!
//! ```rust
//! let scratch = ScratchRegistry::new();
//! scratch.register(working_dir.path());
//!
//! // Worker side, between steps:
//! scratch.check_cancelled()?;
//!
//! // Interrupt side:
//! scratch.cancel();
//! // ... wait for the worker ...
//! scratch.purge();
//! ```
//!
use crate::core::error::{Result, VendorError};
use anyhow::anyhow;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// # Scratch Registry (`ScratchRegistry`)
///
/// Shared, cloneable list of temporary paths owned by the current run, plus
/// the flag telling the worker to stop. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct ScratchRegistry {
    paths: Arc<Mutex<Vec<PathBuf>>>,
    cancelled: Arc<AtomicBool>,
}

impl ScratchRegistry {
    /// # New Registry (`new`)
    ///
    /// Creates an empty registry with the cancellation flag cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// # Register Path (`register`)
    ///
    /// Records `path` for removal on interrupt. Registering a path twice is
    /// harmless; `purge` skips paths that are already gone.
    pub fn register(&self, path: &Path) {
        debug!("Registered scratch path {:?}", path);
        self.paths.lock().push(path.to_path_buf());
    }

    /// Snapshot of the registered paths.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().clone()
    }

    /// Asks the worker to stop at its next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The raw flag, for loops (copying, waiting on a child) that poll it.
    pub fn cancel_flag(&self) -> &AtomicBool {
        &self.cancelled
    }

    /// # Check Cancellation (`check_cancelled`)
    ///
    /// ## Errors
    ///
    /// Returns `VendorError::Interrupted` once `cancel` has been called.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(anyhow!(VendorError::Interrupted));
        }
        Ok(())
    }

    /// Removes every registered path that still exists. Best effort: failures
    /// are logged, not returned.
    pub fn purge(&self) {
        for path in self.paths() {
            let result = match path.symlink_metadata() {
                Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&path),
                Ok(_) => std::fs::remove_file(&path),
                Err(_) => continue, // Already gone.
            };
            match result {
                Ok(()) => debug!("Removed scratch path {:?}", path),
                Err(e) => warn!("Failed to remove scratch path {:?}: {}", path, e),
            }
        }
    }
}
