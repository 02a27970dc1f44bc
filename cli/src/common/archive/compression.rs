//! # Compression Utilities (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! Gzip settings shared by the archive writer. Levels follow zlib: 0 stores,
//! 9 compresses hardest, 6 is the usual default.
//!
use crate::core::error::{Result, VendorError};
use anyhow::anyhow;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

pub const DEFAULT_LEVEL: u32 = 6;
pub const MAX_LEVEL: u32 = 9;

/// Converts a configured level into a `flate2::Compression`.
pub fn gzip_level(level: u32) -> Result<Compression> {
    if level > MAX_LEVEL {
        return Err(anyhow!(VendorError::Config(format!(
            "Gzip compression level must be between 0 and {}, got {}",
            MAX_LEVEL, level
        ))));
    }
    Ok(Compression::new(level))
}

/// Wraps `writer` in a gzip encoder at `level`.
pub fn gzip_writer<W: Write>(writer: W, level: u32) -> Result<GzEncoder<W>> {
    Ok(GzEncoder::new(writer, gzip_level(level)?))
}
