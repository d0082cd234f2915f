//! Build command integration tests.

use std::fs;

use predicates::prelude::*;
use serial_test::serial;

use super::common::{FAKE_ARTIFACT_SIZE, TestEnv};

const TWO_TARGETS: &str = r#"{
  "build-ListProductsFunction": "list-products",
  "build-GetProductFunction": "get-product"
}"#;

#[test]
#[serial]
fn build_single_target_reports_artifact_size() {
  let env = TestEnv::new();
  env.add_function("get-cart");

  env
    .fnbuild_cmd()
    .arg("build-GetCartFunction")
    .assert()
    .success()
    .stdout(predicate::str::contains("Building get-cart..."))
    .stdout(predicate::str::contains("Built get-cart (5,242,880 bytes, 5.0 MB)"));

  let artifact = env.function_dir("get-cart").join("bootstrap");
  assert_eq!(fs::metadata(artifact).unwrap().len(), FAKE_ARTIFACT_SIZE);
}

#[test]
#[serial]
fn build_overrides_cross_compile_environment() {
  let env = TestEnv::new();
  env.add_function("get-cart");

  env
    .fnbuild_cmd()
    .arg("build-GetCartFunction")
    .env("GOOS", "darwin")
    .env("GOARCH", "arm64")
    .env("CGO_ENABLED", "1")
    .assert()
    .success();

  assert_eq!(
    env.invocation("get-cart").unwrap().trim(),
    "build -tags lambda.norpc -o bootstrap main.go|linux|amd64|0"
  );
}

#[test]
#[serial]
fn build_single_target_builds_nothing_else() {
  let env = TestEnv::new();
  env.add_function("get-cart");
  env.add_function("get-order");

  env.fnbuild_cmd().arg("build-GetCartFunction").assert().success();

  assert!(env.invocation("get-cart").is_some());
  assert!(env.invocation("get-order").is_none());
  assert!(!env.function_dir("get-order").join("bootstrap").exists());
}

#[test]
#[serial]
fn unknown_target_spawns_no_compiler() {
  let env = TestEnv::new();
  env.add_function("get-cart");

  env
    .fnbuild_cmd()
    .arg("not-a-real-target")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Unknown target: not-a-real-target"));

  assert!(env.invocation("get-cart").is_none());
}

#[test]
#[serial]
fn compile_failure_surfaces_stderr() {
  let env = TestEnv::new();
  env.add_function("list-products");

  env
    .fnbuild_cmd()
    .arg("build-ListProductsFunction")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Failed to build list-products"))
    .stderr(predicate::str::contains("syntax error: unexpected }"));
}

#[test]
#[serial]
fn build_all_continues_past_failures() {
  let env = TestEnv::new();
  env.add_function("list-products");
  env.add_function("get-product");
  let targets = env.write_targets(TWO_TARGETS);

  env
    .fnbuild_cmd()
    .arg("--targets")
    .arg(&targets)
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Built get-product"))
    .stderr(predicate::str::contains("Failed to build: list-products\n"));

  assert!(env.function_dir("get-product").join("bootstrap").exists());
  assert!(!env.function_dir("list-products").join("bootstrap").exists());
}

#[test]
#[serial]
fn build_all_succeeds_when_every_function_builds() {
  let env = TestEnv::new();
  env.add_function("get-cart");
  env.add_function("get-order");
  let targets = env.write_targets(r#"{"build-GetCartFunction": "get-cart", "build-GetOrderFunction": "get-order"}"#);

  env
    .fnbuild_cmd()
    .arg("--targets")
    .arg(&targets)
    .assert()
    .success()
    .stdout(predicate::str::contains("All functions built successfully!"));
}

#[test]
#[serial]
fn zero_exit_without_artifact_fails() {
  let env = TestEnv::new();
  env.add_function("no-output");
  let targets = env.write_targets(r#"{"build-NoOutputFunction": "no-output"}"#);

  env
    .fnbuild_cmd()
    .arg("--targets")
    .arg(&targets)
    .arg("build-NoOutputFunction")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("artifact not created"));
}

#[test]
#[serial]
fn missing_compiler_is_reported_per_function() {
  let env = TestEnv::new();
  env.add_function("get-cart");

  env
    .fnbuild_cmd()
    .env("FNBUILD_GO", "/nonexistent/bin/go")
    .arg("build-GetCartFunction")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to start /nonexistent/bin/go"));
}

#[test]
#[serial]
fn functions_root_flag_is_respected() {
  let env = TestEnv::new();
  let dir = env.root_path().join("services").join("get-cart");
  fs::create_dir_all(&dir).unwrap();
  fs::write(dir.join("main.go"), "package main\n").unwrap();

  env
    .fnbuild_cmd()
    .args(["-C", "services", "build-GetCartFunction"])
    .assert()
    .success();

  assert!(dir.join("bootstrap").exists());
}

#[test]
#[serial]
fn rebuilding_is_idempotent() {
  let env = TestEnv::new();
  env.add_function("get-cart");

  for _ in 0..2 {
    env
      .fnbuild_cmd()
      .arg("build-GetCartFunction")
      .assert()
      .success()
      .stdout(predicate::str::contains("5,242,880 bytes"));
  }
}

#[test]
#[serial]
fn json_output_summarizes_batch() {
  let env = TestEnv::new();
  env.add_function("list-products");
  env.add_function("get-product");
  let targets = env.write_targets(TWO_TARGETS);

  let output = env
    .fnbuild_cmd()
    .arg("--targets")
    .arg(&targets)
    .args(["--output", "json"])
    .output()
    .unwrap();

  assert_eq!(output.status.code(), Some(1));
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["success"], false);
  assert_eq!(json["built"][0]["function"], "get-product");
  assert_eq!(json["built"][0]["size_bytes"], FAKE_ARTIFACT_SIZE);
  assert_eq!(json["failed"][0]["function"], "list-products");
  assert!(
    json["failed"][0]["stderr"]
      .as_str()
      .unwrap()
      .contains("syntax error")
  );
}
