//! Function build execution.
//!
//! This module provides the orchestrator that resolves targets, compiles
//! function directories one at a time and verifies their artifacts:
//! - A single named target builds exactly that function
//! - No target builds every function in table order, continuing past
//!   failures and collecting them into a [`RunReport`]

pub mod process;
pub mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::targets::TargetMap;
use crate::toolchain::Toolchain;

use process::ProcessRunner;

pub use process::{CommandSpec, ProcessOutput, SystemRunner};
pub use types::{Artifact, BuildError, BuildOutcome, RunReport, RunSummary};

/// Receives progress while a run is in flight.
///
/// Outcomes are also collected in the returned [`RunReport`]; an observer is
/// for reporting each one as soon as it is known.
pub trait BuildObserver {
  /// Called before `function` is built.
  fn started(&mut self, _function: &str) {}

  /// Called once `function` has succeeded or failed.
  fn finished(&mut self, _outcome: &BuildOutcome) {}
}

/// Observer that ignores all progress.
#[derive(Debug, Default)]
pub struct Silent;

impl BuildObserver for Silent {}

/// Builds functions from a target table using a process runner.
#[derive(Debug)]
pub struct Orchestrator<R> {
  targets: TargetMap,
  functions_root: PathBuf,
  toolchain: Toolchain,
  runner: R,
}

impl<R: ProcessRunner> Orchestrator<R> {
  pub fn new(targets: TargetMap, functions_root: impl Into<PathBuf>, toolchain: Toolchain, runner: R) -> Self {
    Self {
      targets,
      functions_root: functions_root.into(),
      toolchain,
      runner,
    }
  }

  pub fn targets(&self) -> &TargetMap {
    &self.targets
  }

  pub fn functions_root(&self) -> &Path {
    &self.functions_root
  }

  pub fn toolchain(&self) -> &Toolchain {
    &self.toolchain
  }

  /// Resolve a target name to its function name.
  ///
  /// # Errors
  ///
  /// Returns [`BuildError::UnknownTarget`] if the target is not in the table.
  pub fn resolve(&self, target: &str) -> Result<&str, BuildError> {
    self
      .targets
      .get(target)
      .ok_or_else(|| BuildError::UnknownTarget(target.to_string()))
  }

  /// Directory holding a function's source and artifact.
  pub fn function_dir(&self, function: &str) -> PathBuf {
    self.functions_root.join(function)
  }

  /// Compile one function and verify its artifact.
  ///
  /// The compiler runs inside the function directory and is the only thing
  /// that writes there. A zero exit status is not trusted on its own: the
  /// artifact must exist afterwards.
  pub fn build_one(&self, function: &str) -> Result<Artifact, BuildError> {
    let result = self.compile(function);
    if let Err(ref err) = result {
      warn!(function, error = %err, "build failed");
    }
    result
  }

  fn compile(&self, function: &str) -> Result<Artifact, BuildError> {
    let dir = self.function_dir(function);

    if !dir.is_dir() {
      return Err(BuildError::DirectoryNotFound { path: dir });
    }

    let spec = self.toolchain.command(&dir);
    info!(function, platform = %self.toolchain.platform, "building function");
    debug!(command = %spec, "running compiler");

    let started = Instant::now();
    let output = self.runner.run(&spec).map_err(|source| BuildError::Spawn {
      program: spec.program.clone(),
      source,
    })?;
    let duration = started.elapsed();

    if !output.success() {
      debug!(function, code = ?output.code, "compiler exited unsuccessfully");
      return Err(BuildError::CompileFailed {
        code: output.code,
        stderr: output.stderr,
      });
    }

    let path = dir.join(&self.toolchain.output);
    let metadata = match fs::metadata(&path) {
      Ok(metadata) if metadata.is_file() => metadata,
      Ok(_) => return Err(BuildError::ArtifactMissing { path }),
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(BuildError::ArtifactMissing { path }),
      Err(source) => return Err(BuildError::Io { path, source }),
    };

    info!(
      function,
      size = metadata.len(),
      elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
      "built function"
    );

    Ok(Artifact {
      function: function.to_string(),
      path,
      size: metadata.len(),
      duration,
    })
  }

  /// Build one named target, or every target when `target` is `None`.
  ///
  /// Every function is attempted even if an earlier one failed.
  ///
  /// # Errors
  ///
  /// Returns [`BuildError::UnknownTarget`] before building anything if a
  /// named target is not in the table. All other failures are recorded in
  /// the report.
  pub fn run(&self, target: Option<&str>, observer: &mut dyn BuildObserver) -> Result<RunReport, BuildError> {
    let functions: Vec<&str> = match target {
      Some(target) => {
        let function = self
          .resolve(target)
          .inspect_err(|err| warn!(error = %err, "target not found"))?;
        vec![function]
      }
      None => {
        info!(count = self.targets.len(), "building all functions");
        self.targets.functions().collect()
      }
    };

    let report = functions.into_iter().fold(RunReport::default(), |mut report, function| {
      observer.started(function);
      let outcome = BuildOutcome {
        function: function.to_string(),
        result: self.build_one(function),
      };
      observer.finished(&outcome);
      report.push(outcome);
      report
    });

    info!(failed = report.failed().len(), attempted = report.outcomes.len(), "run finished");

    Ok(report)
  }
}
