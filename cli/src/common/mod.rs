//! # Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! This module is the root for the shared utility modules used by the command
//! handlers. It keeps command-specific logic (`commands::`) separate from the
//! building blocks it is assembled from.
//!
//! ## Architecture
//!
//! - **`archive`**: Gzipped tarball creation.
//! - **`cargo`**: The `cargo vendor` invocation.
//! - **`fs`**: Filtered copying, file I/O, and scratch path cleanup.
//! - **`git`**: Working-tree status, HEAD revision, and repository root queries.
//! - **`process`**: Running external programs in an explicit directory and capturing output.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{archive, fs, git};
//!
//! let status = git::working_tree_status(&root)?;
//! fs::io::ensure_dir_exists(&out_dir)?;
//! let tmp = archive::tar::create_temp_archive("servo")?;
//! ```
//!

/// Utilities for handling archive files (tarballs, gzip).
pub mod archive;
/// Dependency vendoring through cargo.
pub mod cargo;
/// Utilities for filesystem operations (copying, I/O, scratch cleanup).
pub mod fs;
/// Version-control queries.
pub mod git;
/// Utilities for executing external processes.
pub mod process;
