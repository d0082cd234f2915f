pub mod arch;
pub mod os;

use arch::Arch;
use os::Os;
use std::fmt;

/// Target platform for a cross-compiled function (e.g., "linux/amd64")
///
/// Functions are deployed to a single platform, so [`Os`] and [`Arch`] each
/// have one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// The platform every function is deployed to: `provided.al2` on x86_64
  pub fn lambda() -> Self {
    Self::new(Os::Linux, Arch::Amd64)
  }

  /// Returns the Go platform pair (e.g., "linux/amd64")
  pub fn pair(&self) -> String {
    format!("{}/{}", self.os, self.arch)
  }
}

impl Default for Platform {
  fn default() -> Self {
    Self::lambda()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.pair())
  }
}
