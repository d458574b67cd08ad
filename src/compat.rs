//! Provider compatibility checks.
//!
//! [`is_compatible`] answers the single question "is this provider at least
//! this version?". [`CompatibilityChecker`] wraps it with a
//! [`MinVersionRegistry`] so callers can check by provider name, and skips
//! providers that have no declared minimum instead of comparing empty
//! version strings.
//!
//! # Example
//!
//! ```no_run
//! use provider_gate::compat::{CompatStatus, CompatibilityChecker};
//! use provider_gate::probe::ProbeContext;
//! use provider_gate::registry::MinVersionRegistry;
//! use std::time::Duration;
//!
//! let registry = MinVersionRegistry::parse("vault=0.4.0").unwrap();
//! let checker = CompatibilityChecker::new(&registry);
//! let ctx = ProbeContext::new().with_timeout(Duration::from_secs(5));
//!
//! match checker.check(&ctx, "vault", "/etc/providers/vault").unwrap() {
//!     CompatStatus::Incompatible { current, minimum } => {
//!         eprintln!("vault {current} is older than {minimum}");
//!     }
//!     _ => {}
//! }
//! ```

use crate::error::Result;
use crate::policy;
use crate::probe::{self, ProbeContext};
use crate::registry::MinVersionRegistry;
use std::ffi::OsStr;
use std::fmt;

/// Whether the provider at `executable` reports a version of at least `min_version`.
///
/// Both versions are normalized (one leading `v` stripped) before the
/// semver comparison. Probe and semver errors are returned as-is.
pub fn is_compatible<S: AsRef<OsStr>>(
    ctx: &ProbeContext,
    executable: S,
    min_version: &str,
) -> Result<bool> {
    let current = probe::get_version(executable, ctx)?;
    policy::meets_minimum(&current, min_version)
}

/// Outcome of checking one provider against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatStatus {
    /// The registry declares no minimum; the provider was not probed.
    NoMinimum,

    /// The reported version meets the minimum.
    Compatible { current: String, minimum: String },

    /// The reported version is older than the minimum.
    Incompatible { current: String, minimum: String },
}

impl CompatStatus {
    /// Whether the provider may be used.
    ///
    /// Providers without a declared minimum are usable.
    pub fn is_usable(&self) -> bool {
        !matches!(self, CompatStatus::Incompatible { .. })
    }
}

impl fmt::Display for CompatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatStatus::NoMinimum => write!(f, "no minimum version configured"),
            CompatStatus::Compatible { current, minimum } => {
                write!(f, "compatible ({} >= {})", current, minimum)
            }
            CompatStatus::Incompatible { current, minimum } => {
                write!(f, "incompatible ({} < {})", current, minimum)
            }
        }
    }
}

/// Checks providers against a registry of minimum versions.
///
/// Holds no mutable state, so one checker can serve concurrent checks.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityChecker<'a> {
    registry: &'a MinVersionRegistry,
}

impl<'a> CompatibilityChecker<'a> {
    /// Create a checker over a registry.
    pub fn new(registry: &'a MinVersionRegistry) -> Self {
        Self { registry }
    }

    /// The registry this checker consults.
    pub fn registry(&self) -> &'a MinVersionRegistry {
        self.registry
    }

    /// Check the provider named `provider`, found at `executable`.
    pub fn check<S: AsRef<OsStr>>(
        &self,
        ctx: &ProbeContext,
        provider: &str,
        executable: S,
    ) -> Result<CompatStatus> {
        let Some(minimum) = self.registry.get(provider) else {
            tracing::debug!("No minimum version configured for provider {}", provider);
            return Ok(CompatStatus::NoMinimum);
        };

        let current = probe::get_version(executable, ctx)?;
        let status = if policy::meets_minimum(&current, minimum)? {
            CompatStatus::Compatible {
                current,
                minimum: minimum.to_string(),
            }
        } else {
            CompatStatus::Incompatible {
                current,
                minimum: minimum.to_string(),
            }
        };

        tracing::debug!("provider {}: {}", provider, status);
        Ok(status)
    }
}
