//! # Vendor Archiver Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `vendor-archiver` CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the vendor command and mapping its outcome to an exit code
//!
//! ## Exit codes
//!
//! - `0`: archive produced, or skipped because the working tree is dirty
//! - `1`: any fatal error (git/cargo failure, filesystem error, bad configuration)
//! - `130`: interrupted by Ctrl-C (temporary files removed)
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! vendor-archiver --help
//!
//! # Archive with info-level logging
//! vendor-archiver -v --filename servo-2026-10-19
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command implementations
mod common; // Shared utilities (git, cargo, fs, archive, process)
mod core; // Core infrastructure (errors, config)

use crate::commands::vendor::{VendorArgs, VendorOutcome};
use crate::core::error::VendorError;

const EXIT_FAILURE: i32 = 1;
const EXIT_INTERRUPTED: i32 = 130;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "vendor-archiver",
    about = "Vendor a Cargo project's dependencies and pack it into a revision-stamped .tar.gz",
    long_about = "Copies the project (minus VCS metadata, build output and local environments)\n\
                  into a temporary directory, records the git revision in GIT_REVISION,\n\
                  runs `cargo vendor --locked`, merges its source replacement into\n\
                  .cargo/config.toml and archives the result.",
    version
)]
struct Cli {
    #[command(flatten)]
    vendor: VendorArgs,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    match commands::vendor::handle_vendor(cli.vendor).await {
        Ok(VendorOutcome::Archived {
            destination,
            revision,
        }) => {
            tracing::info!("Archived revision {} to {}", revision, destination.display());
        }
        Ok(VendorOutcome::SkippedDirtyTree { changes }) => {
            tracing::info!("Nothing archived; {} uncommitted change(s)", changes);
        }
        Err(e) => {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            let code = match e.downcast_ref::<VendorError>() {
                Some(VendorError::Interrupted) => EXIT_INTERRUPTED,
                _ => EXIT_FAILURE,
            };
            std::process::exit(code);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["vendor-archiver", "-vv", "--force"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.vendor.force);
    }
}
