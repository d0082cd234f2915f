//! fnbuild-lib: Core types and logic for fnbuild
//!
//! This crate compiles serverless function directories into `bootstrap`
//! binaries:
//! - `TargetMap`: ordered mapping from build target names to functions
//! - `Toolchain`: compiler flags and cross-compilation environment
//! - `Orchestrator`: resolves targets, builds and verifies artifacts
//! - `RunReport`: per-function outcomes of one run

pub mod consts;
pub mod execute;
pub mod platform;
pub mod targets;
pub mod toolchain;
pub mod util;

pub use execute::{BuildError, BuildObserver, BuildOutcome, Orchestrator, RunReport, Silent, SystemRunner};
pub use targets::{TargetMap, TargetsError};
pub use toolchain::Toolchain;
