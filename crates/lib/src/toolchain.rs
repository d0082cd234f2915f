//! Compiler invocation settings.
//!
//! `Toolchain` is the one place the compiler flags and the cross-compilation
//! environment are decided. The environment is rendered into each
//! `CommandSpec` rather than written into this process's environment.

use std::collections::BTreeMap;
use std::path::Path;

use crate::consts::{ARTIFACT_NAME, DEFAULT_COMPILER, ENTRY_POINT, NORPC_BUILD_TAG};
use crate::execute::process::CommandSpec;
use crate::platform::Platform;

/// How a function directory is turned into an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Compiler program, resolved through `PATH` when not a path.
  pub compiler: String,
  /// Build tags passed with `-tags`.
  pub tags: Vec<String>,
  /// Output file name, written inside the function directory.
  pub output: String,
  /// Source file compiled, relative to the function directory.
  pub entry: String,
  /// Target platform shared by every function.
  pub platform: Platform,
  /// Whether cgo may link native code. Off for static binaries.
  pub cgo_enabled: bool,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      compiler: DEFAULT_COMPILER.to_string(),
      tags: vec![NORPC_BUILD_TAG.to_string()],
      output: ARTIFACT_NAME.to_string(),
      entry: ENTRY_POINT.to_string(),
      platform: Platform::lambda(),
      cgo_enabled: false,
    }
  }
}

impl Toolchain {
  /// Replace the compiler program, keeping every other setting.
  pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
    self.compiler = compiler.into();
    self
  }

  /// Arguments passed to the compiler.
  pub fn args(&self) -> Vec<String> {
    let mut args = vec!["build".to_string()];
    if !self.tags.is_empty() {
      args.push("-tags".to_string());
      args.push(self.tags.join(","));
    }
    args.push("-o".to_string());
    args.push(self.output.clone());
    args.push(self.entry.clone());
    args
  }

  /// Variables overriding the inherited environment for every build.
  pub fn env(&self) -> BTreeMap<String, String> {
    BTreeMap::from([
      ("GOOS".to_string(), self.platform.os.as_str().to_string()),
      ("GOARCH".to_string(), self.platform.arch.as_str().to_string()),
      (
        "CGO_ENABLED".to_string(),
        if self.cgo_enabled { "1" } else { "0" }.to_string(),
      ),
    ])
  }

  /// The full compiler invocation for one function directory.
  pub fn command(&self, function_dir: &Path) -> CommandSpec {
    CommandSpec {
      program: self.compiler.clone(),
      args: self.args(),
      cwd: function_dir.to_path_buf(),
      env: self.env(),
    }
  }
}
