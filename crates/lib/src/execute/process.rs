//! Child process execution.
//!
//! Builds talk to the operating system only through [`ProcessRunner`], so the
//! orchestration logic can be exercised with a fake runner and no compiler.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// A fully described child process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory for the child.
  pub cwd: PathBuf,
  /// Variables set on top of the inherited environment.
  pub env: BTreeMap<String, String>,
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  /// Exit code, `None` if the child was terminated by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Runs a command to completion, capturing its output.
pub trait ProcessRunner {
  /// Run `spec` and wait for it to exit.
  ///
  /// A non-zero exit is not an error here; `Err` means the process could not
  /// be started or waited on.
  fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
  fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput> {
    (**self).run(spec)
  }
}

/// Spawns real processes with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
  fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput> {
    debug!(command = %spec, cwd = %spec.cwd.display(), env = ?spec.env, "spawning process");

    let output = Command::new(&spec.program)
      .args(&spec.args)
      .current_dir(&spec.cwd)
      .envs(&spec.env)
      .output()?;

    let result = ProcessOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.stdout.is_empty() {
      debug!(stdout = %result.stdout, "process stdout");
    }
    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr, "process stderr");
    }

    Ok(result)
  }
}
