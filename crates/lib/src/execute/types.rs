//! Types for function builds.
//!
//! This module defines the error type, the per-function outcome and the
//! aggregated report for one orchestrator run.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while resolving or building a function.
///
/// Every variant is recorded against the function it happened to; none of
/// them abort a batch run.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The requested target is not in the target table.
  #[error("unknown target: {0}")]
  UnknownTarget(String),

  /// The function directory does not exist. No process was spawned.
  #[error("directory not found: {}", path.display())]
  DirectoryNotFound { path: PathBuf },

  /// The compiler could not be started.
  #[error("failed to start {program}: {source}")]
  Spawn { program: String, source: std::io::Error },

  /// The compiler exited unsuccessfully.
  #[error("compiler {}", describe_exit(*code))]
  CompileFailed { code: Option<i32>, stderr: String },

  /// The compiler exited successfully but left no artifact behind.
  #[error("artifact not created: {}", path.display())]
  ArtifactMissing { path: PathBuf },

  /// The artifact exists but could not be inspected.
  #[error("failed to inspect artifact {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },
}

impl BuildError {
  /// Captured compiler diagnostics, if this error carries any.
  pub fn diagnostics(&self) -> Option<&str> {
    match self {
      BuildError::CompileFailed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr.trim_end()),
      _ => None,
    }
  }
}

fn describe_exit(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exited with code {}", code),
    None => "was terminated by a signal".to_string(),
  }
}

/// A successfully built and verified function binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub function: String,
  pub path: PathBuf,
  /// Size in bytes, reported for visibility only.
  pub size: u64,
  /// Wall time spent in the compiler.
  pub duration: Duration,
}

/// Result of attempting one function.
#[derive(Debug)]
pub struct BuildOutcome {
  pub function: String,
  pub result: Result<Artifact, BuildError>,
}

impl BuildOutcome {
  pub fn is_success(&self) -> bool {
    self.result.is_ok()
  }
}

/// All outcomes of one run, in the order they were attempted.
#[derive(Debug, Default)]
pub struct RunReport {
  pub outcomes: Vec<BuildOutcome>,
}

impl RunReport {
  pub fn push(&mut self, outcome: BuildOutcome) {
    self.outcomes.push(outcome);
  }

  /// Artifacts of the functions that built.
  pub fn built(&self) -> impl Iterator<Item = &Artifact> {
    self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
  }

  /// Names of the functions that failed, in attempt order.
  pub fn failed(&self) -> Vec<&str> {
    self
      .outcomes
      .iter()
      .filter(|o| !o.is_success())
      .map(|o| o.function.as_str())
      .collect()
  }

  /// Returns true if every attempted function built.
  pub fn is_success(&self) -> bool {
    self.outcomes.iter().all(BuildOutcome::is_success)
  }

  /// Process exit code for this run: 0 on success, 1 otherwise.
  pub fn exit_code(&self) -> u8 {
    if self.is_success() { 0 } else { 1 }
  }

  /// Serializable view of the report.
  pub fn summary(&self) -> RunSummary {
    let mut summary = RunSummary {
      success: self.is_success(),
      built: Vec::new(),
      failed: Vec::new(),
    };

    for outcome in &self.outcomes {
      match &outcome.result {
        Ok(artifact) => summary.built.push(BuiltSummary {
          function: artifact.function.clone(),
          path: artifact.path.clone(),
          size_bytes: artifact.size,
          duration_ms: u64::try_from(artifact.duration.as_millis()).unwrap_or(u64::MAX),
        }),
        Err(err) => summary.failed.push(FailedSummary {
          function: outcome.function.clone(),
          error: err.to_string(),
          stderr: err.diagnostics().map(str::to_string),
        }),
      }
    }

    summary
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
  pub success: bool,
  pub built: Vec<BuiltSummary>,
  pub failed: Vec<FailedSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltSummary {
  pub function: String,
  pub path: PathBuf,
  pub size_bytes: u64,
  pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSummary {
  pub function: String,
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stderr: Option<String>,
}
