//! # Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Command implementations reachable from `main.rs`. The archiver exposes a
//! single command, so its arguments are flattened into the top-level CLI.
//!
//! - `vendor`: Copy, stamp, vendor and archive the project tree
//!

/// Produces the vendored, revision-stamped source archive.
pub mod vendor;
