//! Implementation of `fnbuild --list`.

use anyhow::Result;
use serde_json::{Map, Value};

use fnbuild_lib::TargetMap;

use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_list(targets: &TargetMap, format: OutputFormat) -> Result<()> {
  if format.is_json() {
    let map: Map<String, Value> = targets
      .iter()
      .map(|(target, function)| (target.to_string(), Value::String(function.to_string())))
      .collect();
    return print_json(&map);
  }

  let width = targets.iter().map(|(target, _)| target.len()).max().unwrap_or(0);
  for (target, function) in targets.iter() {
    println!("  {:<width$} {} {}", target, symbols::ARROW, function, width = width);
  }

  Ok(())
}
