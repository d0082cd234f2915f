//! Build target table.
//!
//! Maps the external target names used by the deployment tooling
//! (e.g. `build-GetCartFunction`) to function directory names
//! (e.g. `get-cart`). The table is plain data: adding a function is an
//! entry here or in a targets file, never a new code path.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use thiserror::Error;

/// Targets compiled when no targets file is given, in build order.
const BUILTIN_TARGETS: &[(&str, &str)] = &[
  ("build-ListProductsFunction", "list-products"),
  ("build-GetProductFunction", "get-product"),
  ("build-SearchProductsFunction", "search-products"),
  ("build-GetCartFunction", "get-cart"),
  ("build-AddToCartFunction", "add-to-cart"),
  ("build-ClearCartFunction", "clear-cart"),
  ("build-CreateOrderFunction", "create-order"),
  ("build-ListOrdersFunction", "list-orders"),
  ("build-GetOrderFunction", "get-order"),
  ("build-CreatePaymentIntentFunction", "create-payment-intent"),
  ("build-WebhookHandlerFunction", "webhook-handler"),
  ("build-RegisterUserFunction", "register-user"),
  ("build-LoginUserFunction", "login-user"),
  ("build-JWTAuthorizerFunction", "jwt-authorizer"),
];

/// Errors that can occur while loading a target table.
#[derive(Debug, Error)]
pub enum TargetsError {
  #[error("failed to read targets file {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("invalid targets JSON: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("targets file must contain a JSON object mapping target names to function names")]
  NotAnObject,

  #[error("function for target {target} must be a string")]
  NotAString { target: String },

  #[error("invalid function name {function:?} for target {target}")]
  InvalidFunction { target: String, function: String },

  #[error("duplicate target: {0}")]
  DuplicateTarget(String),

  #[error("target table is empty")]
  Empty,
}

/// Ordered, immutable mapping from target name to function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMap {
  entries: Vec<(String, String)>,
}

impl TargetMap {
  /// The built-in table of deployable functions.
  pub fn builtin() -> Self {
    Self {
      entries: BUILTIN_TARGETS
        .iter()
        .map(|(target, function)| (target.to_string(), function.to_string()))
        .collect(),
    }
  }

  /// Build a table from `(target, function)` pairs, keeping their order.
  ///
  /// # Errors
  ///
  /// Returns an error if the table is empty, a target appears twice, or a
  /// function name would resolve outside the functions root.
  pub fn from_pairs<I, T, F>(pairs: I) -> Result<Self, TargetsError>
  where
    I: IntoIterator<Item = (T, F)>,
    T: Into<String>,
    F: Into<String>,
  {
    let mut entries: Vec<(String, String)> = Vec::new();
    for (target, function) in pairs {
      let target = target.into();
      let function = function.into();

      if entries.iter().any(|(existing, _)| *existing == target) {
        return Err(TargetsError::DuplicateTarget(target));
      }
      if !is_valid_function_name(&function) {
        return Err(TargetsError::InvalidFunction { target, function });
      }
      entries.push((target, function));
    }

    if entries.is_empty() {
      return Err(TargetsError::Empty);
    }

    Ok(Self { entries })
  }

  /// Parse a JSON object of the form `{ "<target>": "<function>", ... }`.
  ///
  /// A target that appears twice in the object is an error, not an override.
  pub fn from_json(json: &str) -> Result<Self, TargetsError> {
    let entries = match serde_json::from_str::<RawEntries>(json) {
      Ok(RawEntries(entries)) => entries,
      Err(e) if e.is_data() => return Err(TargetsError::NotAnObject),
      Err(e) => return Err(e.into()),
    };

    let mut pairs = Vec::with_capacity(entries.len());
    for (target, value) in entries {
      match value {
        Value::String(function) => pairs.push((target, function)),
        _ => return Err(TargetsError::NotAString { target }),
      }
    }

    Self::from_pairs(pairs)
  }

  /// Load a table from a JSON targets file.
  pub fn load(path: &Path) -> Result<Self, TargetsError> {
    let content = fs::read_to_string(path).map_err(|source| TargetsError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }

  /// Look up the function name for a target.
  pub fn get(&self, target: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(name, _)| name == target)
      .map(|(_, function)| function.as_str())
  }

  /// Iterate `(target, function)` pairs in table order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(t, f)| (t.as_str(), f.as_str()))
  }

  /// Iterate function names in table order.
  pub fn functions(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(_, f)| f.as_str())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Default for TargetMap {
  fn default() -> Self {
    Self::builtin()
  }
}

/// Object members in document order, repeated keys included.
///
/// `serde_json::Map` keeps only the last value for a repeated key, which would
/// hide a duplicated target.
struct RawEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
      type Value = RawEntries;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
      }

      fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, Value>()? {
          entries.push(entry);
        }
        Ok(RawEntries(entries))
      }
    }

    deserializer.deserialize_map(EntriesVisitor)
  }
}

/// A function name must be a single path component.
fn is_valid_function_name(name: &str) -> bool {
  !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
