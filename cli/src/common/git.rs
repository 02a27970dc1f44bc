//! # Git Queries (`common::git`)
//!
//! File: cli/src/common/git.rs
//!
//! ## Overview
//!
//! The three version-control questions the archiver asks, each answered by one
//! `git` invocation run in an explicit directory:
//!
//! - **`toplevel`**: `git rev-parse --show-toplevel`, used to find the project root.
//! - **`working_tree_status`**: `git status --porcelain`; any output means dirty.
//! - **`head_revision`**: `git rev-parse HEAD`, kept verbatim as the archive's identity.
//!
use crate::common::process;
use crate::core::error::Result;
use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

const GIT: &str = "git";

/// Result of the porcelain status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStatus {
    raw: Vec<u8>,
}

impl TreeStatus {
    pub fn from_porcelain(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    /// Clean means git printed nothing at all.
    pub fn is_clean(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of porcelain lines, i.e. changed or untracked entries.
    pub fn change_count(&self) -> usize {
        String::from_utf8_lossy(&self.raw)
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count()
    }
}

/// Revision identifier as printed by `git rev-parse HEAD`.
///
/// The captured text is never re-queried or normalized; `as_str` returns it
/// unchanged (including the trailing newline) for stamping into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.trim())
    }
}

/// Returns the top-level directory of the repository containing `dir`.
pub fn toplevel(dir: &Path) -> Result<PathBuf> {
    let output = process::run_captured(GIT, &["rev-parse", "--show-toplevel"], dir)
        .with_context(|| format!("Failed to locate the git repository containing {}", dir.display()))?;
    let text = output.stdout_text()?;
    let root = PathBuf::from(text.trim_end_matches(['\n', '\r']));
    debug!("Git top-level directory: {}", root.display());
    Ok(root)
}

/// Queries whether the working tree rooted at `root` has uncommitted changes.
pub fn working_tree_status(root: &Path) -> Result<TreeStatus> {
    let output = process::run_captured(GIT, &["status", "--porcelain"], root)
        .context("Failed to query git working tree status")?;
    Ok(TreeStatus::from_porcelain(output.stdout))
}

/// Captures the current `HEAD` revision of the repository at `root`.
pub fn head_revision(root: &Path) -> Result<Revision> {
    let output = process::run_captured(GIT, &["rev-parse", "HEAD"], root)
        .context("Failed to read the current git revision")?;
    Ok(Revision::new(output.stdout_text()?))
}
