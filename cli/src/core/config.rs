//! # Vendor Archiver Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system, handling loading, merging,
//! validation, and access to configuration data. Every setting has a built-in
//! default, so running without any configuration file reproduces the standard
//! workflow (`servo.tar.gz`, `vendor/`, `.cargo/config.toml`, ...).
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project configuration: `--config <path>` if given, otherwise
//!    `<project root>/.vendor-archiver.toml`
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/vendor-archiver/config.toml`)
//! 3. Default values defined in the code
//!
//! A project value wins over the user value whenever it differs from the default.
//! After merging, `~` is expanded in the vendoring program path and the result is
//! validated (glob patterns compile, paths are relative, levels are in range).
//!
//! ## Examples
//!
//! ```rust
//! let cfg = config::load_config(&project_root, None)?;
//! let vendor_dir = &cfg.vendor.directory;
//! let patterns = &cfg.copy.exclude;
//! ```
//!
use crate::common::archive::compression;
use crate::common::fs::filter::ExcludeFilter;
use crate::core::error::{Result, VendorError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Component, Path},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub copy: CopyConfig,
    #[serde(default)]
    pub vendor: VendorConfig,
}

/// Settings for the produced archive.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Name used for `<root>/<default_name>.tar.gz` when `--filename` is not given.
    #[serde(default = "default_archive_name")]
    pub default_name: String,
    /// File at the top of the working copy that receives the revision identifier.
    #[serde(default = "default_revision_file")]
    pub revision_file: String,
    /// Gzip level, 0 (store) through 9 (best).
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

/// Settings for copying the project into the working copy.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CopyConfig {
    /// Shell-style patterns matched against entry names at every depth.
    #[serde(default = "default_exclude_patterns")]
    pub exclude: Vec<String>,
}

/// Settings for the dependency vendoring step.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VendorConfig {
    /// Program invoked as `<program> vendor ...` (can use ~). Will be expanded.
    #[serde(default = "default_vendor_program")]
    pub program: String,
    /// Directory, relative to the working copy, that receives the vendored crates.
    #[serde(default = "default_vendor_directory")]
    pub directory: String,
    /// Cargo configuration file the emitted source replacement is appended to.
    #[serde(default = "default_cargo_config_file")]
    pub config_file: String,
    /// What to do when `config_file` is absent from the working copy.
    #[serde(default)]
    pub missing_config: MissingConfigPolicy,
}

/// Behaviour when the cargo configuration file does not exist.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingConfigPolicy {
    /// Abort the run before vendoring.
    #[default]
    Error,
    /// Create an empty file (and its parent directory) and continue.
    Create,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            default_name: default_archive_name(),
            revision_file: default_revision_file(),
            compression_level: default_compression_level(),
        }
    }
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude_patterns(),
        }
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            program: default_vendor_program(),
            directory: default_vendor_directory(),
            config_file: default_cargo_config_file(),
            missing_config: MissingConfigPolicy::default(),
        }
    }
}

fn default_archive_name() -> String {
    "servo".to_string()
}
fn default_revision_file() -> String {
    "GIT_REVISION".to_string()
}
fn default_compression_level() -> u32 {
    compression::DEFAULT_LEVEL
}
fn default_exclude_patterns() -> Vec<String> {
    ["*.git", "target", "etc", ".venv"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}
fn default_vendor_program() -> String {
    "cargo".to_string()
}
fn default_vendor_directory() -> String {
    "vendor".to_string()
}
fn default_cargo_config_file() -> String {
    ".cargo/config.toml".to_string()
}

pub const PROJECT_CONFIG_FILENAME: &str = ".vendor-archiver.toml";

/// Loads, merges, expands and validates the configuration for a project root.
///
/// `explicit` replaces the project-level file lookup; unlike the implicit
/// `.vendor-archiver.toml`, an explicit file that does not exist is an error.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(project_root, explicit)?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("org", "VendorArchiver", "vendor-archiver") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config(project_root: &Path, explicit: Option<&Path>) -> Result<Option<Config>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(anyhow!(VendorError::Config(format!(
                "Configuration file '{}' does not exist.",
                path.display()
            ))));
        }
        info!("Loading configuration from: {}", path.display());
        return load_config_from_path(path).map(Some);
    }

    let path = project_root.join(PROJECT_CONFIG_FILENAME);
    if path.is_file() {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No {} found in {}", PROJECT_CONFIG_FILENAME, project_root.display());
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Picks `project` when it was changed from `default`, otherwise keeps `user`.
fn prefer<T: PartialEq>(project: T, user: T, default: T) -> T {
    if project != default {
        project
    } else {
        user
    }
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    Config {
        archive: ArchiveConfig {
            default_name: prefer(
                project.archive.default_name,
                user.archive.default_name,
                default_archive_name(),
            ),
            revision_file: prefer(
                project.archive.revision_file,
                user.archive.revision_file,
                default_revision_file(),
            ),
            compression_level: prefer(
                project.archive.compression_level,
                user.archive.compression_level,
                default_compression_level(),
            ),
        },
        copy: CopyConfig {
            exclude: prefer(
                project.copy.exclude,
                user.copy.exclude,
                default_exclude_patterns(),
            ),
        },
        vendor: VendorConfig {
            program: prefer(
                project.vendor.program,
                user.vendor.program,
                default_vendor_program(),
            ),
            directory: prefer(
                project.vendor.directory,
                user.vendor.directory,
                default_vendor_directory(),
            ),
            config_file: prefer(
                project.vendor.config_file,
                user.vendor.config_file,
                default_cargo_config_file(),
            ),
            missing_config: prefer(
                project.vendor.missing_config,
                user.vendor.missing_config,
                MissingConfigPolicy::default(),
            ),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    config.vendor.program = shellexpand::tilde(&config.vendor.program).into_owned();
    debug!("Expanded vendor program: {}", config.vendor.program);
}

/// Rejects empty, absolute, or parent-escaping paths for settings that live
/// inside the working copy.
fn validate_relative_path(field: &str, value: &str) -> Result<()> {
    let path = Path::new(value);
    if value.is_empty() || !path.is_relative() {
        return Err(anyhow!(VendorError::Config(format!(
            "`{}` must be a non-empty relative path, got '{}'.",
            field, value
        ))));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(anyhow!(VendorError::Config(format!(
            "`{}` must stay inside the working copy, got '{}'.",
            field, value
        ))));
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");

    let name = &config.archive.default_name;
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(anyhow!(VendorError::Config(format!(
            "`archive.default_name` must be a plain file name, got '{}'.",
            name
        ))));
    }
    validate_relative_path("archive.revision_file", &config.archive.revision_file)?;
    if config.archive.compression_level > compression::MAX_LEVEL {
        return Err(anyhow!(VendorError::Config(format!(
            "`archive.compression_level` must be between 0 and {}, got {}.",
            compression::MAX_LEVEL,
            config.archive.compression_level
        ))));
    }

    ExcludeFilter::new(&config.copy.exclude)?;

    if config.vendor.program.trim().is_empty() {
        return Err(anyhow!(VendorError::Config(
            "`vendor.program` cannot be empty.".to_string()
        )));
    }
    validate_relative_path("vendor.directory", &config.vendor.directory)?;
    validate_relative_path("vendor.config_file", &config.vendor.config_file)?;

    info!("Configuration validation successful.");
    Ok(())
}
