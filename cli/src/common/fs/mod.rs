//! # Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module groups the filesystem helpers used to build a working copy and
//! place the finished archive.
//!
//! ## Architecture
//!
//! - **`copy`**: Recursive copy of the project tree, pruning excluded entries.
//! - **`filter`**: The `ExcludeFilter` glob set applied to entry names.
//! - **`io`**: Directory creation, file writes/appends, and moving temp files into place.
//! - **`scratch`**: Registry of temporary paths so an interrupt can remove them.
//!
//! Import from the specific submodule (e.g. `crate::common::fs::io::write_string_to_file`).
//!

/// Filtered recursive copy (`copy_tree_filtered`).
pub mod copy;
/// Name-based exclusion patterns (`ExcludeFilter`).
pub mod filter;
/// Basic file I/O operations.
pub mod io;
/// Temporary path bookkeeping for interrupt cleanup.
pub mod scratch;
