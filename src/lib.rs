//! provider-gate - Version compatibility gate for provider binaries.
//!
//! A plugin-hosting driver spawns external provider binaries. Before using
//! one, it asks the binary for its version (`<provider> --version`, which
//! prints a JSON record) and compares that against a configured minimum.
//!
//! # Modules
//!
//! - [`cli`] - Diagnostic command-line interface
//! - [`compat`] - Compatibility decisions
//! - [`config`] - Configuration from the environment
//! - [`error`] - Error types and result aliases
//! - [`policy`] - Semver validation, normalization, and comparison
//! - [`probe`] - Bounded `--version` probing of provider binaries
//! - [`registry`] - Minimum version registry parsing
//!
//! # Example
//!
//! ```
//! use provider_gate::registry::MinVersionRegistry;
//! use provider_gate::policy;
//!
//! let registry = MinVersionRegistry::parse("vault=1.0.0,azure=2.1.3").unwrap();
//! let minimum = registry.get("vault").unwrap();
//! assert!(policy::meets_minimum("v1.2.0", minimum).unwrap());
//! ```
//!
//! For probing real binaries, see [`compat::is_compatible`].

pub mod cli;
pub mod compat;
pub mod config;
pub mod error;
pub mod policy;
pub mod probe;
pub mod registry;

#[cfg(all(test, unix))]
mod test_support;

pub use compat::{is_compatible, CompatStatus, CompatibilityChecker};
pub use error::{GateError, Result};
pub use registry::{build_registry, MinVersionRegistry};
