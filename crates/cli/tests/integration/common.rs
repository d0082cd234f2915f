//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Size of the artifact the fake compiler writes (5 MiB).
pub const FAKE_ARTIFACT_SIZE: u64 = 5_242_880;

/// Stand-in for `go build -tags lambda.norpc -o bootstrap main.go`.
///
/// Records its arguments and environment in `invocation.txt`, fails for
/// `list-products`, exits 0 without output for `no-output`, and otherwise
/// writes a 5 MiB file at the `-o` path.
const FAKE_GO: &str = r#"#!/bin/sh
printf '%s|%s|%s|%s\n' "$*" "$GOOS" "$GOARCH" "$CGO_ENABLED" > invocation.txt
case "$(basename "$PWD")" in
  list-products)
    echo "./main.go:3:1: syntax error: unexpected }" >&2
    exit 1
    ;;
  no-output)
    exit 0
    ;;
esac
head -c 5242880 /dev/zero > "$5"
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary working directory containing a
/// `functions/` root and a fake compiler.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    let go = env.fake_go_path();
    fs::create_dir_all(go.parent().unwrap()).unwrap();
    fs::write(&go, FAKE_GO).unwrap();
    fs::set_permissions(&go, fs::Permissions::from_mode(0o755)).unwrap();
    env
  }

  /// Working directory for the binary.
  pub fn root_path(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf())
  }

  pub fn fake_go_path(&self) -> PathBuf {
    self.temp.path().join("bin").join("go")
  }

  pub fn function_dir(&self, name: &str) -> PathBuf {
    self.root_path().join("functions").join(name)
  }

  /// Create `functions/<name>/main.go`.
  pub fn add_function(&self, name: &str) -> PathBuf {
    let dir = self.function_dir(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
    dir
  }

  /// Write a targets file and return its path.
  pub fn write_targets(&self, json: &str) -> PathBuf {
    let path = self.root_path().join("targets.json");
    fs::write(&path, json).unwrap();
    path
  }

  /// What the fake compiler recorded for a function, if it ran there.
  pub fn invocation(&self, name: &str) -> Option<String> {
    fs::read_to_string(self.function_dir(name).join("invocation.txt")).ok()
  }

  /// Get a pre-configured Command for the fnbuild binary.
  ///
  /// Runs in the test root and points `FNBUILD_GO` at the fake compiler.
  pub fn fnbuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("fnbuild");
    cmd.current_dir(self.root_path());
    cmd.env_remove("FNBUILD_FUNCTIONS_ROOT");
    cmd.env_remove("FNBUILD_TARGETS");
    cmd.env_remove("RUST_LOG");
    cmd.env("FNBUILD_GO", self.fake_go_path());
    cmd
  }
}
