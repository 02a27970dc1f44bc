//! # Cargo Vendoring (`common::cargo`)
//!
//! File: cli/src/common/cargo.rs
//!
//! ## Overview
//!
//! Wraps `cargo vendor`. The command is always run with:
//! - `--locked`, so a lockfile that disagrees with the manifests fails the run,
//! - the configured output directory (`vendor` by default),
//! - `--versioned-dirs`, so each crate lands in `<name>-<version>/`.
//!
//! Cargo prints the `[source]` replacement that callers must merge into their
//! `.cargo/config.toml` on stdout; `vendor` returns that text untouched.
//!
use crate::common::process;
use crate::core::error::Result;
use anyhow::Context;
use std::ffi::OsString;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info};

/// Builds the argument list passed to the vendoring program.
pub fn vendor_args(vendor_dir: &str) -> Vec<OsString> {
    vec![
        "vendor".into(),
        "--locked".into(),
        vendor_dir.into(),
        "--versioned-dirs".into(),
    ]
}

/// Vendors the locked dependencies of the workspace at `workdir` into
/// `workdir/<vendor_dir>` and returns the config fragment cargo printed.
/// The vendoring process is killed if `cancel` is set while it runs.
pub fn vendor(program: &str, workdir: &Path, vendor_dir: &str, cancel: &AtomicBool) -> Result<String> {
    let args = vendor_args(vendor_dir);
    info!("Vendoring crates into {}", workdir.join(vendor_dir).display());
    let output = process::run_captured_cancellable(program, &args, workdir, cancel)
        .context("Dependency vendoring failed")?;

    let stderr = output.stderr_lossy();
    if !stderr.trim().is_empty() {
        debug!("{} vendor stderr:\n{}", program, stderr.trim_end());
    }
    output
        .stdout_text()
        .context("Vendoring tool emitted a non UTF-8 configuration fragment")
}
