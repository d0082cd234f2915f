mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fnbuild_lib::consts::{DEFAULT_COMPILER, DEFAULT_FUNCTIONS_ROOT};
use fnbuild_lib::{Orchestrator, SystemRunner, TargetMap, Toolchain};

use output::OutputFormat;

/// fnbuild - Compile serverless functions into deployable bootstrap binaries
#[derive(Parser)]
#[command(name = "fnbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Build target to compile (e.g. build-GetCartFunction); builds every target if omitted
  target: Option<String>,

  /// Directory containing one subdirectory per function
  #[arg(short = 'C', long, env = "FNBUILD_FUNCTIONS_ROOT", default_value = DEFAULT_FUNCTIONS_ROOT)]
  functions_root: PathBuf,

  /// Go compiler program to invoke
  #[arg(long, env = "FNBUILD_GO", default_value = DEFAULT_COMPILER)]
  go: String,

  /// JSON file mapping target names to function names (replaces the built-in table)
  #[arg(long, env = "FNBUILD_TARGETS")]
  targets: Option<PathBuf>,

  /// List available targets and exit
  #[arg(long)]
  list: bool,

  /// Output format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  init_tracing(cli.verbose);

  let targets = match &cli.targets {
    Some(path) => {
      TargetMap::load(path).with_context(|| format!("Failed to load targets from {}", path.display()))?
    }
    None => TargetMap::builtin(),
  };

  let toolchain = Toolchain::default().with_compiler(cli.go);
  let orchestrator = Orchestrator::new(targets, cli.functions_root, toolchain, SystemRunner);

  if cli.list {
    cmd::cmd_list(orchestrator.targets(), cli.output)?;
    return Ok(ExitCode::SUCCESS);
  }

  let root = orchestrator.functions_root();
  let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
  debug!(
    root = %root.display(),
    targets = orchestrator.targets().len(),
    compiler = %orchestrator.toolchain().compiler,
    "starting"
  );

  cmd::cmd_build(&orchestrator, cli.target.as_deref(), cli.output)
}

/// Logs go to stderr so stdout carries only build reports.
///
/// Defaults to `error`; failed builds log at `warn` and show up with `-v`.
fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
