//! # Vendor Archiver Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the application. Specific,
//! matchable failures are variants of `VendorError`; everything else travels as an
//! `anyhow::Error` with context attached at the call site.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `VendorError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors
//! - Filesystem errors
//! - Missing or failing external tools (`git`, `cargo`)
//! - The cargo configuration file being absent
//! - Operator interrupts
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.exists() {
//!     anyhow::bail!(VendorError::FileSystem(format!("Path not found: {}", path.display())));
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//!
//! // Pattern matching on error types
//! if let Some(VendorError::Interrupted) = err.downcast_ref::<VendorError>() {
//!     std::process::exit(130);
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the vendor archiver.
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Required tool '{tool}' was not found. Make sure it is installed and on PATH.")]
    ToolNotFound { tool: String },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error(
        "Cargo configuration file '{}' does not exist in the working copy. \
         Commit one, or set `vendor.missing_config = \"create\"`.",
        path.display()
    )]
    MissingCargoConfig { path: PathBuf },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),

    #[error("Interrupted; temporary files were removed.")]
    Interrupted,
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
