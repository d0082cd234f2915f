//! Terminal output for fnbuild.
//!
//! Progress and success lines go to stdout, failures to stderr. Symbols are
//! colored only when the stream supports it.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const STEP: &str = "•";
  pub const ARROW: &str = "→";
}

/// Artifact size, exact and in binary units: `5,242,880 bytes, 5.0 MB`.
pub fn format_size(bytes: u64) -> String {
  format!("{} bytes, {}", group_thousands(bytes), binary_units(bytes))
}

fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

fn binary_units(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }

  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

/// Compile time: `850ms`, `2.4s` or `1m 05s`.
pub fn format_duration(duration: Duration) -> String {
  match duration.as_millis() {
    millis @ 0..1_000 => format!("{}ms", millis),
    1_000..60_000 => format!("{:.1}s", duration.as_secs_f64()),
    _ => {
      let secs = duration.as_secs();
      format!("{}m {:02}s", secs / 60, secs % 60)
    }
  }
}

/// `• Building get-cart...`
pub fn print_step(message: &str) {
  println!(
    "{} {}",
    symbols::STEP.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

/// Failure line on stderr, red as a whole so it stands out between steps.
pub fn print_error(message: &str) {
  let line = format!("{} {}", symbols::ERROR, message);
  eprintln!("{}", line.if_supports_color(Stream::Stderr, |s| s.red()));
}

/// Prints captured compiler output to stderr, indented under the preceding error.
pub fn print_diagnostics(text: &str) {
  for line in text.lines() {
    eprintln!("    {}", line.if_supports_color(Stream::Stderr, |s| s.dimmed()));
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
