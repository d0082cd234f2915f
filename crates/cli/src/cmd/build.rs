//! Implementation of the default `fnbuild [TARGET]` command.
//!
//! Builds one target, or every target in table order, printing each outcome
//! as soon as it is known and a summary for batch runs.

use std::process::ExitCode;

use anyhow::Result;
use serde_json::json;

use fnbuild_lib::execute::process::ProcessRunner;
use fnbuild_lib::{BuildError, BuildObserver, BuildOutcome, Orchestrator, Silent};

use crate::output::{
  OutputFormat, format_duration, format_size, print_diagnostics, print_error, print_json, print_step, print_success,
};

/// Prints per-function progress lines.
struct TerminalReporter;

impl BuildObserver for TerminalReporter {
  fn started(&mut self, function: &str) {
    print_step(&format!("Building {}...", function));
  }

  fn finished(&mut self, outcome: &BuildOutcome) {
    match &outcome.result {
      Ok(artifact) => print_success(&format!(
        "Built {} ({}) in {}",
        artifact.function,
        format_size(artifact.size),
        format_duration(artifact.duration)
      )),
      Err(err) => {
        print_error(&format!("Failed to build {}: {}", outcome.function, err));
        if let Some(stderr) = err.diagnostics() {
          print_diagnostics(stderr);
        }
      }
    }
  }
}

/// Execute the build command.
///
/// Returns the process exit code: success only if every requested function
/// built and produced its artifact.
pub fn cmd_build<R: ProcessRunner>(
  orchestrator: &Orchestrator<R>,
  target: Option<&str>,
  format: OutputFormat,
) -> Result<ExitCode> {
  if target.is_none() && !format.is_json() {
    println!("Building all functions...");
    println!();
  }

  let result = if format.is_json() {
    orchestrator.run(target, &mut Silent)
  } else {
    orchestrator.run(target, &mut TerminalReporter)
  };

  let report = match result {
    Ok(report) => report,
    Err(BuildError::UnknownTarget(name)) => {
      if format.is_json() {
        print_json(&json!({ "success": false, "error": format!("unknown target: {}", name) }))?;
      } else {
        print_error(&format!("Unknown target: {}", name));
        eprintln!("Run with --list to see available targets.");
      }
      return Ok(ExitCode::FAILURE);
    }
    Err(e) => return Err(e.into()),
  };

  if format.is_json() {
    print_json(&report.summary())?;
  } else if target.is_none() {
    println!();
    let failed = report.failed();
    if failed.is_empty() {
      print_success("All functions built successfully!");
    } else {
      print_error(&format!("Failed to build: {}", failed.join(", ")));
    }
  }

  Ok(ExitCode::from(report.exit_code()))
}
