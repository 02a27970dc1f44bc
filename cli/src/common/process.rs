//! # Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs external programs (`git`, `cargo`) to completion and captures their
//! output. Every invocation names its working directory explicitly; the process
//! current directory is never changed.
//!
//! ## Architecture
//!
//! - **`run_captured`**: Spawns the program with piped stdout/stderr, waits for it,
//!   and returns a `CapturedOutput`.
//! - **`run_captured_cancellable`**: The same, polling a cancellation flag and
//!   killing the child once it is set.
//! - A program that cannot be found maps to `VendorError::ToolNotFound`.
//! - A non-zero exit maps to `VendorError::ExternalCommand`, carrying the
//!   command line, the exit status, and the captured stderr (or stdout when
//!   stderr is empty).
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process;
//!
//! let output = process::run_captured("git", &["rev-parse", "HEAD"], &project_root)?;
//! let revision = output.stdout_text()?;
//! ```
//!
use crate::core::error::{Result, VendorError};
use anyhow::{anyhow, Context};
use std::ffi::OsStr;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// How often a running child is checked for exit and for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// # Captured Output (`CapturedOutput`)
///
/// Raw stdout and stderr of a command that exited successfully.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    /// # Standard Output as Text (`stdout_text`)
    ///
    /// Standard output decoded as UTF-8, byte for byte.
    ///
    /// ## Errors
    ///
    /// Returns an `Err` if stdout is not valid UTF-8.
    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("Command output is not valid UTF-8")
    }

    /// Lossy rendering of stderr for logs and messages.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Renders `program args...` for log lines and error messages.
fn display_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Drains a child pipe on its own thread so neither pipe can fill up and
/// stall the child.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn collect(handle: JoinHandle<std::io::Result<Vec<u8>>>, what: &str) -> Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| anyhow!("Reader thread for {} panicked", what))?
        .with_context(|| format!("Failed to read {}", what))
}

/// # Run Captured (`run_captured`)
///
/// Runs `program` with `args` inside `cwd`, blocking until it exits.
///
/// ## Errors
///
/// - `VendorError::ToolNotFound` if the program is not on PATH.
/// - `VendorError::ExternalCommand` if it exits unsuccessfully.
/// - Any other spawn or wait failure, with context.
pub fn run_captured<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: &Path,
) -> Result<CapturedOutput> {
    run_captured_cancellable(program, args, cwd, &AtomicBool::new(false))
}

/// # Run Captured, Cancellable (`run_captured_cancellable`)
///
/// Like `run_captured`, but polls `cancel` while the child runs. Once it is
/// set the child is killed and reaped.
///
/// ## Errors
///
/// Everything `run_captured` returns, plus `VendorError::Interrupted` when
/// the child was killed because `cancel` was set.
pub fn run_captured_cancellable<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: &Path,
    cancel: &AtomicBool,
) -> Result<CapturedOutput> {
    let cmd_line = display_command(program, args);
    debug!("Running `{}` in {}", cmd_line, cwd.display());

    let mut child = match Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(anyhow!(VendorError::ToolNotFound {
                tool: program.to_string(),
            }));
        }
        Err(e) => {
            return Err(anyhow!(e).context(format!(
                "Failed to execute `{}` in {}",
                cmd_line,
                cwd.display()
            )));
        }
    };

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let status = loop {
        if let Some(status) = child
            .try_wait()
            .with_context(|| format!("Failed to wait for `{}`", cmd_line))?
        {
            break status;
        }
        if cancel.load(Ordering::SeqCst) {
            warn!("Stopping `{}`", cmd_line);
            if let Err(e) = child.kill() {
                warn!("Failed to kill `{}`: {}", cmd_line, e);
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap `{}`: {}", cmd_line, e);
            }
            // The reader threads are left to finish on their own.
            return Err(anyhow!(VendorError::Interrupted));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let captured = CapturedOutput {
        stdout: collect(stdout_reader, "stdout")?,
        stderr: collect(stderr_reader, "stderr")?,
    };
    debug!(
        "`{}` finished: status={}, stdout={} bytes, stderr={} bytes",
        cmd_line,
        status,
        captured.stdout.len(),
        captured.stderr.len()
    );

    if !status.success() {
        let mut detail = captured.stderr_lossy();
        if detail.trim().is_empty() {
            detail = String::from_utf8_lossy(&captured.stdout).into_owned();
        }
        return Err(anyhow!(VendorError::ExternalCommand {
            cmd: cmd_line,
            status: status.to_string(),
            output: detail.trim_end().to_string(),
        }));
    }

    Ok(captured)
}
