//! # Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: locating the binary, building a
//! throwaway git repository that looks like a Cargo workspace, installing a
//! fake `cargo` on PATH, and reading archives back.
//!
//! Each test gets its own `TMPDIR` so leftovers from the run can be detected,
//! and its own `XDG_CONFIG_HOME` so a developer's user config never leaks in.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create an `assert_cmd::Command` for the compiled binary.
pub fn archiver_cmd() -> Command {
    Command::cargo_bin("vendor-archiver").expect("Failed to find vendor-archiver binary for testing")
}

const FAKE_CARGO: &str = r#"#!/bin/sh
if [ "$1" != "vendor" ]; then echo "unexpected invocation: $*" >&2; exit 2; fi
if [ -n "$FAKE_CARGO_HANG" ]; then
  : > "$FAKE_CARGO_HANG"
  exec sleep 30
fi
if [ -n "$FAKE_CARGO_FAIL" ]; then
  echo "error: the lock file needs to be updated but --locked was passed to prevent this" >&2
  exit 101
fi
[ "$2" = "--locked" ] || { echo "missing --locked" >&2; exit 2; }
[ "$4" = "--versioned-dirs" ] || { echo "missing --versioned-dirs" >&2; exit 2; }
mkdir -p "$3/itoa-1.0.11"
echo 'pub fn itoa() {}' > "$3/itoa-1.0.11/lib.rs"
echo "   Vendoring itoa v1.0.11" >&2
printf '[source.crates-io]\nreplace-with = "vendored-sources"\n\n[source.vendored-sources]\ndirectory = "%s"\n' "$3"
"#;

/// A git repository laid out like a small Cargo workspace, plus the scratch
/// directories a run needs.
pub struct Fixture {
    pub repo: TempDir,
    pub tmp: TempDir,
    pub tools: TempDir,
    pub xdg: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            repo: TempDir::new().expect("repo dir"),
            tmp: TempDir::new().expect("tmp dir"),
            tools: TempDir::new().expect("tools dir"),
            xdg: TempDir::new().expect("xdg dir"),
        };
        fixture.install_fake_cargo();
        fixture.populate();
        fixture.git(&["init", "-q"]);
        fixture.commit_all("initial import");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.repo.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write fixture file");
    }

    fn populate(&self) {
        self.write("Cargo.toml", "[workspace]\nmembers = [\"components/layout\"]\n");
        self.write("Cargo.lock", "version = 3\n");
        self.write(".cargo/config.toml", "[build]\nrustflags = []\n");
        self.write(".gitignore", "/target/\n.venv/\n*.tar.gz\n");
        self.write("components/layout/Cargo.toml", "[package]\nname = \"layout\"\n");
        self.write("components/layout/src/lib.rs", "pub fn layout() {}\n");
        self.write("etc/vendor_tool.py", "print('tooling')\n");
        // Ignored by git, but present on disk: must still be kept out of the archive.
        self.write("target/debug/servo", "binary");
        self.write(".venv/bin/python", "#!/bin/sh\n");
        self.write("components/layout/target/debug/liblayout.rlib", "rlib");
        self.write("components/layout/.venv/pyvenv.cfg", "home = /usr\n");
    }

    fn install_fake_cargo(&self) {
        let path = self.tools.path().join("cargo");
        fs::write(&path, FAKE_CARGO).expect("write fake cargo");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        }
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args([
                "-c",
                "user.name=Archive Test",
                "-c",
                "user.email=archive@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.root())
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("git output is UTF-8")
    }

    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    /// The binary as a plain `std::process::Command`, configured to run
    /// against this fixture. Used where the test must spawn and signal it.
    pub fn std_cmd(&self) -> std::process::Command {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.tools.path().to_path_buf()];
        paths.extend(std::env::split_paths(&path));

        let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("vendor-archiver"));
        cmd.current_dir(self.root())
            .env("PATH", std::env::join_paths(paths).expect("join PATH"))
            .env("TMPDIR", self.tmp.path())
            .env("XDG_CONFIG_HOME", self.xdg.path())
            .env_remove("VENDOR_ARCHIVER_ROOT")
            .env_remove("FAKE_CARGO_FAIL")
            .env_remove("FAKE_CARGO_HANG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// The binary, configured to run against this fixture.
    pub fn cmd(&self) -> Command {
        Command::from_std(self.std_cmd())
    }

    /// Entries left behind in the run's temp directory.
    pub fn leftover_temp_entries(&self) -> Vec<PathBuf> {
        fs::read_dir(self.tmp.path())
            .expect("read tmp dir")
            .map(|e| e.expect("entry").path())
            .collect()
    }

    pub fn default_archive(&self) -> PathBuf {
        self.root().join("servo.tar.gz")
    }
}

/// Reads every regular file in a `.tar.gz` into `path -> content`, and lists
/// directories with a trailing `/`.
pub fn read_archive(path: &Path) -> BTreeMap<String, String> {
    let file = fs::File::open(path).expect("open archive");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut entries = BTreeMap::new();
    for entry in archive.entries().expect("read entries") {
        let mut entry = entry.expect("entry");
        let name = entry
            .path()
            .expect("entry path")
            .to_string_lossy()
            .trim_start_matches("./")
            .trim_end_matches('/')
            .to_string();
        if name.is_empty() || name == "." {
            continue;
        }
        if entry.header().entry_type().is_dir() {
            entries.insert(format!("{}/", name), String::new());
        } else {
            let mut content = String::new();
            std::io::Read::read_to_string(&mut entry, &mut content).expect("read entry");
            entries.insert(name, content);
        }
    }
    entries
}
