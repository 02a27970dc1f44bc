//! # Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Creation of the distributable archive.
//!
//! - **`tar`**: Builds gzipped tarballs of a directory, in memory or in a temp file.
//! - **`compression`**: Gzip level handling and encoder construction.
//!
//! ```rust
//! use crate::common::archive;
//!
//! let tmp_archive = archive::tar::create_temp_archive("servo")?;
//! archive::tar::write_tar_gz_file(working_copy.path(), tmp_archive.as_file(), 6)?;
//! ```
//!

pub mod compression;
pub mod tar;
