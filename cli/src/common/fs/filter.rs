//! # Exclusion Filter (`common::fs::filter`)
//!
//! File: cli/src/common/fs/filter.rs
//!
//! Shell-style patterns (`*`, `?`, `[...]`) matched against a single entry
//! name. Because only the name is tested, a pattern such as `target` excludes
//! `./target` and `./components/foo/target` alike.
//!
//! Exact paths can be excluded as well (`with_path`); the archiver uses this to
//! keep its own output file out of the copy when it lives under the root.
//!
use crate::core::error::{Result, VendorError};
use anyhow::anyhow;
use glob::{MatchOptions, Pattern};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<Pattern>,
    paths: Vec<PathBuf>,
}

impl ExcludeFilter {
    /// # New Filter (`new`)
    ///
    /// Compiles every pattern, failing on the first invalid one.
    ///
    /// ## Errors
    ///
    /// Returns `VendorError::Config` naming the pattern that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    anyhow!(VendorError::Config(format!(
                        "Invalid exclude pattern '{}': {}",
                        p.as_ref(),
                        e
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            paths: Vec::new(),
        })
    }

    /// Also excludes the entry whose full path equals `path`.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// True when `name` matches any pattern. Non UTF-8 names are compared lossily.
    pub fn excludes(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(&name, options))
    }

    /// True when the entry at `path` is excluded, by exact path or by name.
    pub fn excludes_entry(&self, path: &Path) -> bool {
        if self.paths.iter().any(|p| p == path) {
            return true;
        }
        path.file_name().is_some_and(|name| self.excludes(name))
    }
}
